//! Polling settings for the three Amplify resource types.
//!
//! Loaded from JSON when the defaults need tuning:
//!
//! ```json
//! {
//!   "domain": {
//!     "create": { "delaySeconds": 60, "timeoutSeconds": 900 },
//!     "update": { "delaySeconds": 30, "timeoutSeconds": 600 },
//!     "delete": { "delaySeconds": 10, "timeoutSeconds": 300 }
//!   }
//! }
//! ```
//!
//! Only what is given is overridden. Resource sections left out, and fields left
//! out of a section, keep that resource's defaults.

use handler_framework::{Constant, ResourceTimings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const fn secs(delay: u64, timeout: u64) -> Constant {
    Constant::new(Duration::from_secs(delay), Duration::from_secs(timeout))
}

/// Apps and branches are usable as soon as their create or update call returns.
const APP_TIMINGS: ResourceTimings = ResourceTimings {
    create: None,
    update: None,
    delete: secs(5, 300),
};

/// Domain associations wait on certificate issuance, so create polls every three
/// minutes for up to ten.
const DOMAIN_TIMINGS: ResourceTimings = ResourceTimings {
    create: Some(secs(180, 600)),
    update: Some(secs(60, 600)),
    delete: secs(10, 300),
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid handler settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsOverrides")]
pub struct HandlerSettings {
    pub app: ResourceTimings,
    pub branch: ResourceTimings,
    pub domain: ResourceTimings,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            app: APP_TIMINGS,
            branch: APP_TIMINGS,
            domain: DOMAIN_TIMINGS,
        }
    }
}

/// What a settings document may contain: any subset of the timings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsOverrides {
    app: TimingsOverride,
    branch: TimingsOverride,
    domain: TimingsOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimingsOverride {
    create: Option<Constant>,
    update: Option<Constant>,
    delete: Option<Constant>,
}

impl TimingsOverride {
    fn over(self, base: ResourceTimings) -> ResourceTimings {
        ResourceTimings {
            create: self.create.or(base.create),
            update: self.update.or(base.update),
            delete: self.delete.unwrap_or(base.delete),
        }
    }
}

impl From<SettingsOverrides> for HandlerSettings {
    fn from(overrides: SettingsOverrides) -> Self {
        Self {
            app: overrides.app.over(APP_TIMINGS),
            branch: overrides.branch.over(APP_TIMINGS),
            domain: overrides.domain.over(DOMAIN_TIMINGS),
        }
    }
}

impl HandlerSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

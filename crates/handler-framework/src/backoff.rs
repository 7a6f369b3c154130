//! # Backoff Configuration
//!
//! Stabilization uses a constant delay strategy bounded by an overall timeout.
//! Each resource type enumerates its own [`ResourceTimings`]; nothing is hidden in
//! constants inside the handlers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIN_POLL_UNIT: Duration = Duration::from_secs(1);

/// Constant delay between polls, bounded by an overall timeout.
///
/// On the wire both values are expressed in whole seconds:
///
/// ```json
/// { "delaySeconds": 180, "timeoutSeconds": 600 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    #[serde(rename = "delaySeconds", with = "seconds")]
    pub delay: Duration,
    #[serde(rename = "timeoutSeconds", with = "seconds")]
    pub timeout: Duration,
}

impl Constant {
    pub const fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    /// Delay to wait after the `attempt`-th poll that did not stabilize (1-based).
    ///
    /// Returns `None` once the attempt budget of [`Constant::max_attempts`] is spent.
    /// The decision only depends on the attempt count, so replaying the same context
    /// gives the same answer.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt <= self.max_attempts()).then_some(self.delay)
    }

    /// Number of polls that may come back unstable before the timeout fires.
    ///
    /// A zero delay is budgeted at one second per poll, so the timeout still bounds it.
    pub fn max_attempts(&self) -> u32 {
        let unit = self.delay.max(MIN_POLL_UNIT);
        let attempts = self.timeout.as_millis() / unit.as_millis();
        u32::try_from(attempts).unwrap_or(u32::MAX)
    }
}

/// Stabilization strategies for one resource type.
///
/// `None` for create or update means the resource is usable as soon as the
/// mutating call returns. Deletes are always confirmed by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTimings {
    #[serde(default)]
    pub create: Option<Constant>,
    #[serde(default)]
    pub update: Option<Constant>,
    pub delete: Constant,
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

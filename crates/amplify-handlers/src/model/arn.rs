//! Amplify resource ARNs.
//!
//! ```text
//! arn:aws:amplify:us-east-1:123456789012:apps/d2abc
//! arn:aws:amplify:us-east-1:123456789012:apps/d2abc/branches/main
//! arn:aws:amplify:us-east-1:123456789012:apps/d2abc/domains/example.com
//! ```
//!
//! Read, update and delete requests may only carry the ARN, so handlers fall back to
//! these helpers to recover the app id and child name.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePath {
    App { app_id: String },
    Branch { app_id: String, branch_name: String },
    Domain { app_id: String, domain_name: String },
}

impl ResourcePath {
    pub fn app_id(&self) -> &str {
        match self {
            ResourcePath::App { app_id }
            | ResourcePath::Branch { app_id, .. }
            | ResourcePath::Domain { app_id, .. } => app_id,
        }
    }
}

/// Parse an Amplify ARN. Branch names may contain `/`.
pub fn parse(arn: &str) -> Option<ResourcePath> {
    let mut parts = arn.splitn(6, ':');
    if parts.next()? != "arn" {
        return None;
    }
    let _partition = parts.next()?;
    if parts.next()? != "amplify" {
        return None;
    }
    let _region = parts.next()?;
    let _account = parts.next()?;
    let resource = parts.next()?.strip_prefix("apps/")?;

    let (app_id, rest) = match resource.split_once('/') {
        Some((app_id, rest)) => (app_id, Some(rest)),
        None => (resource, None),
    };
    if app_id.is_empty() {
        return None;
    }
    let app_id = app_id.to_string();

    match rest {
        None => Some(ResourcePath::App { app_id }),
        Some(rest) => {
            if let Some(branch_name) = rest.strip_prefix("branches/") {
                (!branch_name.is_empty()).then(|| ResourcePath::Branch {
                    app_id,
                    branch_name: branch_name.to_string(),
                })
            } else if let Some(domain_name) = rest.strip_prefix("domains/") {
                (!domain_name.is_empty()).then(|| ResourcePath::Domain {
                    app_id,
                    domain_name: domain_name.to_string(),
                })
            } else {
                None
            }
        }
    }
}

pub fn format(region: &str, account: &str, path: &ResourcePath) -> String {
    let resource = match path {
        ResourcePath::App { app_id } => format!("apps/{app_id}"),
        ResourcePath::Branch {
            app_id,
            branch_name,
        } => format!("apps/{app_id}/branches/{branch_name}"),
        ResourcePath::Domain {
            app_id,
            domain_name,
        } => format!("apps/{app_id}/domains/{domain_name}"),
    };
    format!("arn:aws:amplify:{region}:{account}:{resource}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_each_resource_kind() {
        assert_eq!(
            parse("arn:aws:amplify:us-east-1:123456789012:apps/d2abc"),
            Some(ResourcePath::App {
                app_id: "d2abc".into()
            })
        );
        assert_eq!(
            parse("arn:aws:amplify:us-east-1:123456789012:apps/d2abc/branches/feature/login"),
            Some(ResourcePath::Branch {
                app_id: "d2abc".into(),
                branch_name: "feature/login".into()
            })
        );
        assert_eq!(
            parse("arn:aws:amplify:eu-west-1:123456789012:apps/d2abc/domains/example.com"),
            Some(ResourcePath::Domain {
                app_id: "d2abc".into(),
                domain_name: "example.com".into()
            })
        );
    }

    #[test]
    fn test_rejects_foreign_arns() {
        assert_eq!(parse("arn:aws:s3:::bucket"), None);
        assert_eq!(parse("arn:aws:amplify:us-east-1:123456789012:apps/"), None);
        assert_eq!(
            parse("arn:aws:amplify:us-east-1:123456789012:apps/d2abc/jobs/1"),
            None
        );
        assert_eq!(parse("not-an-arn"), None);
    }

    #[test]
    fn test_format_matches_parse() {
        let path = ResourcePath::Domain {
            app_id: "d2abc".into(),
            domain_name: "example.com".into(),
        };
        let arn = format("us-east-1", "123456789012", &path);
        assert_eq!(parse(&arn), Some(path));
    }
}

//! Classification of request paths into public and protected routes.
//!
//! Paths are compared segment by segment after normalization, never by raw
//! string prefix: `/adminXYZ` is not under `/admin`.
use anyhow::{bail, Result};

use crate::config::AuthSettings;

/// Where a path sits relative to the protected area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Outside the protected prefix
    Public,
    /// The login page inside the protected prefix; needs no session
    ProtectedEntry,
    /// Inside the protected prefix; needs session evidence
    Protected,
}

/// Normalize a request path into its segments
///
/// Empty and `.` segments are dropped, `..` pops the previous segment, and
/// every segment is percent-decoded. Returns `None` when the path cannot be
/// interpreted unambiguously: `..` above the root, invalid UTF-8 after
/// decoding, a malformed escape, or a decoded segment that hides a separator.
pub fn normalize_segments(path: &str) -> Option<Vec<String>> {
    let mut segments: Vec<String> = Vec::new();

    for raw in path.split('/') {
        let segment = if raw.contains('%') {
            if !has_valid_escapes(raw) {
                return None;
            }
            urlencoding::decode(raw).ok()?.into_owned()
        } else {
            raw.to_string()
        };

        if segment.contains(['/', '\\', '\0']) {
            return None;
        }

        match segment.as_str() {
            "" | "." => {},
            ".." => {
                segments.pop()?;
            },
            _ => segments.push(segment),
        }
    }

    Some(segments)
}

/// Every `%` must start a two-digit hex escape
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// The protected prefix and its public entry, pre-split into segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRules {
    protected_prefix: Vec<String>,
    login_path: Vec<String>,
}

impl RouteRules {
    pub fn new(protected_prefix: &str, login_path: &str) -> Result<Self> {
        let Some(protected_prefix) = normalize_segments(protected_prefix) else {
            bail!("protected prefix {protected_prefix:?} is not a clean path");
        };
        let Some(login_path) = normalize_segments(login_path) else {
            bail!("login path {login_path:?} is not a clean path");
        };

        if protected_prefix.is_empty() {
            bail!("protected prefix must not be the site root");
        }
        if login_path.len() <= protected_prefix.len() || !login_path.starts_with(&protected_prefix)
        {
            bail!("login path must lie strictly inside the protected prefix");
        }

        Ok(Self {
            protected_prefix,
            login_path,
        })
    }

    pub fn from_settings(auth: &AuthSettings) -> Result<Self> {
        Self::new(&auth.protected_prefix, &auth.login_path)
    }

    /// Classify a request path
    ///
    /// Paths that cannot be normalized classify as [`RouteClass::Protected`].
    pub fn classify(&self, path: &str) -> RouteClass {
        let Some(segments) = normalize_segments(path) else {
            return RouteClass::Protected;
        };

        if segments == self.login_path {
            RouteClass::ProtectedEntry
        } else if segments.starts_with(&self.protected_prefix) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RouteRules {
        RouteRules::new("/admin", "/admin/login").unwrap()
    }

    #[test]
    fn test_normalize_segments() {
        assert_eq!(normalize_segments("/").unwrap(), Vec::<String>::new());
        assert_eq!(
            normalize_segments("//admin/./dashboard/").unwrap(),
            vec!["admin", "dashboard"]
        );
        assert_eq!(
            normalize_segments("/about/../admin").unwrap(),
            vec!["admin"]
        );
        assert_eq!(normalize_segments("/%61dmin").unwrap(), vec!["admin"]);
        assert!(normalize_segments("/../admin").is_none());
        assert!(normalize_segments("/admin%2Flogin").is_none());
        assert!(normalize_segments("/admin\\login").is_none());
        assert!(normalize_segments("/%ff").is_none());
        assert!(normalize_segments("/%zz").is_none());
        assert!(normalize_segments("/admin%").is_none());
    }

    #[test]
    fn test_classify_protected() {
        let rules = rules();
        assert_eq!(rules.classify("/admin"), RouteClass::Protected);
        assert_eq!(rules.classify("/admin/"), RouteClass::Protected);
        assert_eq!(rules.classify("/admin/dashboard"), RouteClass::Protected);
        assert_eq!(rules.classify("/admin/login/extra"), RouteClass::Protected);
        assert_eq!(rules.classify("/admin/loginXYZ"), RouteClass::Protected);
        assert_eq!(rules.classify("/about/../admin/x"), RouteClass::Protected);
        assert_eq!(rules.classify("/%61dmin/dashboard"), RouteClass::Protected);
    }

    #[test]
    fn test_classify_login_entry() {
        let rules = rules();
        assert_eq!(rules.classify("/admin/login"), RouteClass::ProtectedEntry);
        assert_eq!(rules.classify("/admin/login/"), RouteClass::ProtectedEntry);
        assert_eq!(rules.classify("/admin//login"), RouteClass::ProtectedEntry);
    }

    #[test]
    fn test_classify_public() {
        let rules = rules();
        assert_eq!(rules.classify("/"), RouteClass::Public);
        assert_eq!(rules.classify("/about"), RouteClass::Public);
        assert_eq!(rules.classify("/adminXYZ"), RouteClass::Public);
        assert_eq!(rules.classify("/administrator"), RouteClass::Public);
        assert_eq!(rules.classify("/career/admin"), RouteClass::Public);
        assert_eq!(rules.classify("/admin/../about"), RouteClass::Public);
    }

    #[test]
    fn test_ambiguous_paths_are_protected() {
        let rules = rules();
        assert_eq!(rules.classify("/../about"), RouteClass::Protected);
        assert_eq!(rules.classify("/about%2F..%2Fadmin"), RouteClass::Protected);
        assert_eq!(rules.classify("/%zz"), RouteClass::Protected);
    }

    #[test]
    fn test_rules_reject_bad_configuration() {
        assert!(RouteRules::new("/", "/login").is_err());
        assert!(RouteRules::new("/admin", "/admin").is_err());
        assert!(RouteRules::new("/admin", "/login").is_err());
        assert!(RouteRules::new("/admin", "/adminlogin").is_err());
    }
}

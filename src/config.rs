//! Referer cookie configuration.
//!
//! `RefererCookieConfig` controls how the [`RefererTracker`](crate::referer::RefererTracker)
//! names, scopes and expires its cookie, and which referrer hosts count as internal or
//! external.
//!
//! Defaults are provided via [`Default`], and a fluent [`RefererCookieConfig::builder()`]
//! validates the result. Configuration can also be loaded from JSON with the same keys
//! a hosting application would expose in its settings file.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use referer_cookie::config::RefererCookieConfig;
//! let cfg = RefererCookieConfig::default();
//! assert_eq!(cfg.name, "referer");
//! assert_eq!(cfg.lifetime, 604800);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use referer_cookie::config::RefererCookieConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RefererCookieConfig::builder()
//!     .name("origin")
//!     .lifetime(3600)
//!     .secure(true)
//!     .track_internal_referer(true)
//!     .internal_domains(["*.example.com"])
//!     .build()?;
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//! ```rust
//! use referer_cookie::config::RefererCookieConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RefererCookieConfig::from_json_str(r#"{ "name": "ref", "internal_domains": ["example.com"] }"#)?;
//! assert_eq!(cfg.path, "/");
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `name`: Cookie name (default: `"referer"`, must not be blank).
//! - `lifetime`: Cookie lifetime in seconds (default: one week, must be positive).
//! - `path` / `domain` / `secure` / `httponly`: `Set-Cookie` attributes.
//! - `auto_init`: Let [`on_request`](crate::referer::RefererTracker::on_request) initialize the tracker.
//! - `track_internal_referer`: Persist internal referrers as well as external ones.
//! - `internal_domains` / `external_domains`: Ordered host glob patterns.

use serde::{Deserialize, Deserializer};

use crate::errors::RefererError;

pub const DEFAULT_COOKIE_NAME: &str = "referer";
pub const DEFAULT_LIFETIME: i64 = 604_800;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefererCookieConfig {
    pub name: String,
    #[serde(deserialize_with = "non_negative")]
    pub lifetime: i64,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub httponly: bool,
    pub auto_init: bool,
    pub track_internal_referer: bool,
    pub internal_domains: Vec<String>,
    pub external_domains: Vec<String>,
}

impl Default for RefererCookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            lifetime: DEFAULT_LIFETIME,
            path: "/".to_string(),
            domain: String::new(),
            secure: false,
            httponly: false,
            auto_init: true,
            track_internal_referer: false,
            internal_domains: Vec::new(),
            external_domains: Vec::new(),
        }
    }
}

impl RefererCookieConfig {
    pub fn builder() -> RefererCookieConfigBuilder {
        RefererCookieConfigBuilder::default()
    }

    /// Parses a JSON settings object. Missing keys take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, RefererError> {
        let cfg: RefererCookieConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the invariants the tracker relies on.
    pub fn validate(&self) -> Result<(), RefererError> {
        validate_name(&self.name)?;
        validate_lifetime(self.lifetime)?;
        Ok(())
    }
}

/// Builder for [`RefererCookieConfig`], mirroring the other config builders.
#[derive(Debug, Clone, Default)]
pub struct RefererCookieConfigBuilder {
    inner: RefererCookieConfig,
}

impl RefererCookieConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut RefererCookieConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn name<S: Into<String>>(self, name: S) -> Self { self.map(|c| c.name = name.into()) }
    pub fn lifetime(self, seconds: i64) -> Self { self.map(|c| c.lifetime = seconds) }
    pub fn path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.path = path.into()) }
    pub fn domain<S: Into<String>>(self, domain: S) -> Self { self.map(|c| c.domain = domain.into()) }
    pub fn secure(self, on: bool) -> Self { self.map(|c| c.secure = on) }
    pub fn httponly(self, on: bool) -> Self { self.map(|c| c.httponly = on) }
    pub fn auto_init(self, on: bool) -> Self { self.map(|c| c.auto_init = on) }
    pub fn track_internal_referer(self, on: bool) -> Self { self.map(|c| c.track_internal_referer = on) }

    pub fn internal_domains<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map(|c| c.internal_domains = patterns.into_iter().map(Into::into).collect())
    }

    pub fn external_domains<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map(|c| c.external_domains = patterns.into_iter().map(Into::into).collect())
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut RefererCookieConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<RefererCookieConfig, RefererError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

pub(crate) fn validate_name(name: &str) -> Result<(), RefererError> {
    if name.trim().is_empty() {
        return Err(RefererError::InvalidConfig(format!(
            "name has unexpected value \"{name}\", value can't be empty"
        )));
    }
    Ok(())
}

pub(crate) fn validate_lifetime(lifetime: i64) -> Result<(), RefererError> {
    if lifetime <= 0 {
        return Err(RefererError::InvalidConfig(format!(
            "lifetime has unexpected value \"{lifetime}\", value must be positive"
        )));
    }
    Ok(())
}

fn non_negative<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 0 {
        return Err(serde::de::Error::custom(format!(
            "lifetime must be at least 0, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_settings_surface() {
        let cfg = RefererCookieConfig::default();
        assert_eq!(cfg.name, "referer");
        assert_eq!(cfg.lifetime, 604800);
        assert_eq!(cfg.path, "/");
        assert_eq!(cfg.domain, "");
        assert!(!cfg.secure);
        assert!(!cfg.httponly);
        assert!(cfg.auto_init);
        assert!(!cfg.track_internal_referer);
        assert!(cfg.internal_domains.is_empty());
        assert!(cfg.external_domains.is_empty());
    }

    #[test]
    fn builder_rejects_blank_name() {
        let err = RefererCookieConfig::builder().name("   ").build().unwrap_err();
        assert!(matches!(err, RefererError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_non_positive_lifetime() {
        for lifetime in [0, -5] {
            let err = RefererCookieConfig::builder().lifetime(lifetime).build().unwrap_err();
            assert!(matches!(err, RefererError::InvalidConfig(_)), "lifetime {lifetime}");
        }
    }

    #[test]
    fn builder_collects_patterns_in_order() {
        let cfg = RefererCookieConfig::builder()
            .internal_domains(["b.test", "a.test"])
            .external_domains(vec!["*.search".to_string()])
            .build()
            .unwrap();
        assert_eq!(cfg.internal_domains, vec!["b.test", "a.test"]);
        assert_eq!(cfg.external_domains, vec!["*.search"]);
    }

    #[test]
    fn json_missing_keys_take_defaults() {
        let cfg = RefererCookieConfig::from_json_str(
            r#"{"name":"ref","httponly":true,"track_internal_referer":true,"internal_domains":["*.example.com"]}"#,
        )
        .unwrap();
        assert_eq!(cfg.name, "ref");
        assert!(cfg.httponly);
        assert!(cfg.track_internal_referer);
        assert_eq!(cfg.internal_domains, vec!["*.example.com"]);
        assert_eq!(cfg.lifetime, DEFAULT_LIFETIME);
        assert_eq!(cfg.path, "/");
    }

    #[test]
    fn json_negative_lifetime_is_a_parse_error() {
        let err = RefererCookieConfig::from_json_str(r#"{"lifetime":-1}"#).unwrap_err();
        assert!(matches!(err, RefererError::Config(_)));
    }

    #[test]
    fn json_zero_lifetime_fails_validation() {
        let err = RefererCookieConfig::from_json_str(r#"{"lifetime":0}"#).unwrap_err();
        assert!(matches!(err, RefererError::InvalidConfig(_)));
    }

    #[test]
    fn json_garbage_is_a_parse_error() {
        let err = RefererCookieConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, RefererError::Config(_)));
    }
}

//! Cookie core types.
//!
//! A [`Cookie`] is what the tracker hands to a [`CookieStore`](crate::cookies::CookieStore)
//! when it persists or deletes its payload. It carries the raw value, an absolute expiry
//! and the transport attributes from the configuration.
//!
//! ```rust
//! use referer_cookie::cookies::{Cookie, CookieAttributes};
//!
//! let c = Cookie {
//!     name: "referer".into(),
//!     value: r#"{"referer_external":"https://other.test/y"}"#.into(),
//!     expires: 1_700_000_000,
//!     attributes: CookieAttributes {
//!         path: "/".into(),
//!         domain: "".into(),
//!         secure: true,
//!         http_only: true,
//!     },
//! };
//! assert!(c.to_set_cookie_header().starts_with("referer=%7B"));
//! ```

use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::RefererCookieConfig;

/// Expiry used for deletions: one second before the epoch, always in the past.
pub(crate) const EXPIRED: i64 = -1;

/// Latest expiry that can be rendered: 9999-12-31T23:59:59Z.
pub const MAX_EXPIRES: i64 = 253_402_300_799;

/// Earliest expiry that can be rendered: -9999-01-01T00:00:00Z.
const MIN_EXPIRES: i64 = -377_705_116_800;

/// Scoping and security attributes sent along with every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    /// Path scoping (e.g., `"/"`).
    pub path: String,

    /// Domain scoping. Empty means host-only.
    pub domain: String,

    /// If `true`, cookie is sent only over HTTPS.
    pub secure: bool,

    /// If `true`, cookie is hidden from client-side scripts.
    pub http_only: bool,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: String::new(),
            secure: false,
            http_only: false,
        }
    }
}

impl From<&RefererCookieConfig> for CookieAttributes {
    fn from(cfg: &RefererCookieConfig) -> Self {
        Self {
            path: cfg.path.clone(),
            domain: cfg.domain.clone(),
            secure: cfg.secure,
            http_only: cfg.httponly,
        }
    }
}

/// A cookie write instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value, not yet percent-encoded.
    pub value: String,

    /// Absolute expiry as unix seconds.
    pub expires: i64,

    pub attributes: CookieAttributes,
}

impl Cookie {
    /// Builds the instruction that removes `name` from the client.
    pub fn removal(name: &str, attributes: &CookieAttributes) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            expires: EXPIRED,
            attributes: attributes.clone(),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.value.is_empty() && self.expires <= 0
    }

    /// Renders the value of a `Set-Cookie` response header.
    ///
    /// The value is percent-encoded, so JSON payloads survive the `;`/`,`/`"`
    /// restrictions of the cookie grammar. `Domain` is omitted when empty.
    pub fn to_set_cookie_header(&self) -> String {
        let mut out = format!("{}={}", self.name, urlencoding::encode(&self.value));

        if let Some(date) = http_date(self.expires) {
            out.push_str("; Expires=");
            out.push_str(&date);
        }
        if self.is_removal() {
            out.push_str("; Max-Age=0");
        }
        if !self.attributes.path.is_empty() {
            out.push_str("; Path=");
            out.push_str(&self.attributes.path);
        }
        if !self.attributes.domain.is_empty() {
            out.push_str("; Domain=");
            out.push_str(&self.attributes.domain);
        }
        if self.attributes.secure {
            out.push_str("; Secure");
        }
        if self.attributes.http_only {
            out.push_str("; HttpOnly");
        }

        out
    }
}

/// Formats unix seconds as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
/// Timestamps outside the representable range are clamped to it.
fn http_date(timestamp: i64) -> Option<String> {
    let fmt = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    let timestamp = timestamp.clamp(MIN_EXPIRES, MAX_EXPIRES);
    OffsetDateTime::from_unix_timestamp(timestamp).ok()?.format(fmt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> CookieAttributes {
        CookieAttributes {
            path: "/shop".into(),
            domain: "example.com".into(),
            secure: true,
            http_only: true,
        }
    }

    #[test]
    fn http_date_is_imf_fixdate() {
        assert_eq!(http_date(784_111_777).as_deref(), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    }

    #[test]
    fn far_future_expiry_is_clamped_not_dropped() {
        for expires in [400_000_000_000, MAX_EXPIRES + 1, i64::MAX] {
            let c = Cookie {
                name: "referer".into(),
                value: "v".into(),
                expires,
                attributes: CookieAttributes::default(),
            };
            assert_eq!(
                c.to_set_cookie_header(),
                "referer=v; Expires=Fri, 31 Dec 9999 23:59:59 GMT; Path=/",
                "expires {expires}"
            );
        }
    }

    #[test]
    fn set_cookie_header_carries_all_attributes() {
        let c = Cookie {
            name: "referer".into(),
            value: "a b".into(),
            expires: 784_111_777,
            attributes: attrs(),
        };
        assert_eq!(
            c.to_set_cookie_header(),
            "referer=a%20b; Expires=Sun, 06 Nov 1994 08:49:37 GMT; Path=/shop; Domain=example.com; Secure; HttpOnly"
        );
    }

    #[test]
    fn empty_domain_and_flags_are_omitted() {
        let c = Cookie {
            name: "referer".into(),
            value: "x".into(),
            expires: 0,
            attributes: CookieAttributes::default(),
        };
        assert_eq!(c.to_set_cookie_header(), "referer=x; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Path=/");
    }

    #[test]
    fn removal_expires_in_the_past() {
        let c = Cookie::removal("referer", &attrs());
        assert!(c.is_removal());
        assert_eq!(c.value, "");
        assert_eq!(c.expires, EXPIRED);

        let header = c.to_set_cookie_header();
        assert!(header.starts_with("referer=; Expires=Wed, 31 Dec 1969 23:59:59 GMT; Max-Age=0"), "{header}");
    }

    #[test]
    fn json_value_is_percent_encoded() {
        let c = Cookie {
            name: "referer".into(),
            value: r#"{"referer_external":"https://o.test/?a=1;b"}"#.into(),
            expires: 1,
            attributes: CookieAttributes::default(),
        };
        let header = c.to_set_cookie_header();
        let value = header.split(';').next().unwrap();
        assert!(!value.contains('"'));
        assert!(!value.contains(','));
        assert_eq!(
            urlencoding::decode(value.trim_start_matches("referer=")).unwrap(),
            r#"{"referer_external":"https://o.test/?a=1;b"}"#
        );
    }

    #[test]
    fn attributes_follow_config() {
        let cfg = RefererCookieConfig::builder()
            .path("/app")
            .domain(".example.com")
            .secure(true)
            .build()
            .unwrap();
        let a = CookieAttributes::from(&cfg);
        assert_eq!(a.path, "/app");
        assert_eq!(a.domain, ".example.com");
        assert!(a.secure);
        assert!(!a.http_only);
    }
}

//! The referer payload and its cookie encoding.
//!
//! On the wire the payload is a JSON object with at most two string members,
//! `referer_external` and `referer_internal`. Absent values are omitted, never
//! written as `null`. Decoding is lenient: unknown members, `null`s and non-string
//! values are dropped, and anything that is not a JSON object decodes to nothing.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

const PREFIX: &str = "referer_";

/// One of the two referer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefererKey {
    Internal,
    External,
}

impl RefererKey {
    pub const ALL: [RefererKey; 2] = [RefererKey::External, RefererKey::Internal];

    /// Fully-qualified field name used on the wire.
    pub fn field(self) -> &'static str {
        match self {
            RefererKey::Internal => "referer_internal",
            RefererKey::External => "referer_external",
        }
    }

    /// Accepts both the short (`internal`) and the qualified (`referer_internal`) form.
    pub fn parse(key: &str) -> Option<RefererKey> {
        let qualified = Self::qualify(key);
        Self::ALL.into_iter().find(|k| k.field() == qualified)
    }

    /// Qualified form of an arbitrary key, used in error messages.
    pub(crate) fn qualify(key: &str) -> String {
        if key.starts_with(PREFIX) {
            key.to_string()
        } else {
            format!("{PREFIX}{key}")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefererPayload {
    pub referer_external: Option<String>,
    pub referer_internal: Option<String>,
}

impl RefererPayload {
    pub fn get(&self, key: RefererKey) -> Option<&str> {
        match key {
            RefererKey::Internal => self.referer_internal.as_deref(),
            RefererKey::External => self.referer_external.as_deref(),
        }
    }

    pub fn set(&mut self, key: RefererKey, value: String) {
        match key {
            RefererKey::Internal => self.referer_internal = Some(value),
            RefererKey::External => self.referer_external = Some(value),
        }
    }

    /// Shallow overlay: every value present in `other` replaces ours.
    pub fn overlay(&mut self, other: &RefererPayload) {
        for key in RefererKey::ALL {
            if let Some(v) = other.get(key) {
                self.set(key, v.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.referer_external.is_none() && self.referer_internal.is_none()
    }

    /// Present values keyed by their wire name.
    pub fn present(&self) -> BTreeMap<String, String> {
        RefererKey::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k.field().to_string(), v.to_string())))
            .collect()
    }

    pub fn encode(&self) -> String {
        let map: Map<String, Value> = self
            .present()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Value::Object(map).to_string()
    }

    /// Decodes a stored cookie value. Returns `None` when it is not a JSON object.
    pub fn decode(raw: &str) -> Option<RefererPayload> {
        let Value::Object(map) = serde_json::from_str::<Value>(raw).ok()? else {
            return None;
        };

        let mut payload = RefererPayload::default();
        for key in RefererKey::ALL {
            if let Some(Value::String(v)) = map.get(key.field()) {
                payload.set(key, v.clone());
            }
        }
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_normalization() {
        assert_eq!(RefererKey::parse("internal"), Some(RefererKey::Internal));
        assert_eq!(RefererKey::parse("referer_internal"), Some(RefererKey::Internal));
        assert_eq!(RefererKey::parse("external"), Some(RefererKey::External));
        assert_eq!(RefererKey::parse("referer_external"), Some(RefererKey::External));
        assert_eq!(RefererKey::parse("referer_"), None);
        assert_eq!(RefererKey::parse("Internal"), None);
        assert_eq!(RefererKey::parse("utm_source"), None);
        assert_eq!(RefererKey::qualify("utm_source"), "referer_utm_source");
        assert_eq!(RefererKey::qualify("referer_x"), "referer_x");
    }

    #[test]
    fn encode_omits_absent_values() {
        let p = RefererPayload {
            referer_external: Some("https://other.test/y".into()),
            referer_internal: None,
        };
        assert_eq!(p.encode(), r#"{"referer_external":"https://other.test/y"}"#);
        assert_eq!(RefererPayload::default().encode(), "{}");
    }

    #[test]
    fn encode_orders_external_first() {
        let p = RefererPayload {
            referer_external: Some("https://old.test".into()),
            referer_internal: Some("https://a.example.com".into()),
        };
        assert_eq!(
            p.encode(),
            r#"{"referer_external":"https://old.test","referer_internal":"https://a.example.com"}"#
        );
    }

    #[test]
    fn decode_after_encode_is_identity() {
        let cases = [
            RefererPayload::default(),
            RefererPayload { referer_external: Some("https://e.test/\"q\"".into()), referer_internal: None },
            RefererPayload { referer_external: None, referer_internal: Some("https://i.test/ü".into()) },
            RefererPayload {
                referer_external: Some("https://e.test".into()),
                referer_internal: Some("https://i.test".into()),
            },
        ];
        for p in cases {
            let wire = p.encode();
            assert!(!wire.contains("null"), "{wire}");
            assert_eq!(RefererPayload::decode(&wire), Some(p));
        }
    }

    #[test]
    fn decode_drops_nulls_unknown_keys_and_non_strings() {
        let p = RefererPayload::decode(
            r#"{"referer_external":null,"referer_internal":42,"utm":"x","referer_other":"y"}"#,
        )
        .unwrap();
        assert!(p.is_empty());

        let p = RefererPayload::decode(r#"{"referer_external":"https://e.test","extra":[1]}"#).unwrap();
        assert_eq!(p.referer_external.as_deref(), Some("https://e.test"));
        assert_eq!(p.referer_internal, None);
    }

    #[test]
    fn decode_rejects_non_objects() {
        for raw in ["", "nope", "[]", "\"str\"", "null", "{\"referer_external\":"] {
            assert_eq!(RefererPayload::decode(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn overlay_keeps_unchanged_keys() {
        let mut base = RefererPayload {
            referer_external: Some("https://old.test".into()),
            referer_internal: Some("https://i.test".into()),
        };
        base.overlay(&RefererPayload {
            referer_external: Some("https://new.test".into()),
            referer_internal: None,
        });
        assert_eq!(base.referer_external.as_deref(), Some("https://new.test"));
        assert_eq!(base.referer_internal.as_deref(), Some("https://i.test"));
    }
}

use std::collections::HashMap;

use crate::cookies::store::CookieStore;
use crate::cookies::Cookie;

/// In-memory cookie store (no transport). Keeps the current values plus every
/// write it received, in order, so callers can inspect what would have been sent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCookieStore {
    values: HashMap<String, String>,
    writes: Vec<Cookie>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a cookie as if the client had sent it.
    pub fn with_cookie<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// All write instructions received so far, including removals.
    pub fn writes(&self) -> &[Cookie] {
        &self.writes
    }

    pub fn last_write(&self) -> Option<&Cookie> {
        self.writes.last()
    }
}

impl CookieStore for InMemoryCookieStore {
    fn read_cookie(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn write_cookie(&mut self, cookie: Cookie) {
        if cookie.is_removal() {
            self.values.remove(&cookie.name);
        } else {
            self.values.insert(cookie.name.clone(), cookie.value.clone());
        }
        self.writes.push(cookie);
    }
}

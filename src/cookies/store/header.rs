//! `http` header adapter.
//!
//! `HeaderCookieStore` parses the request's `Cookie` header(s) once, and turns every
//! write into a `Set-Cookie` header on an outgoing [`HeaderMap`]. Reads always reflect
//! what the client sent with this request; writes only show up on the next one.
//!
//! ### Parsing behavior
//! - Accepts multiple `Cookie` headers; pairs are split on `;`.
//! - Pairs without `=` are ignored. On duplicate names the first one wins.
//! - Values are percent-decoded; values that do not decode to UTF-8 are kept raw.
//!
//! ### Example
//! ```rust
//! use http::HeaderMap;
//! use http::header::{COOKIE, SET_COOKIE};
//! use referer_cookie::cookies::{CookieAttributes, CookieStore, HeaderCookieStore};
//!
//! let mut req = HeaderMap::new();
//! req.insert(COOKIE, "referer=%7B%7D; theme=dark".parse().unwrap());
//!
//! let mut store = HeaderCookieStore::from_request(&req);
//! assert_eq!(store.read_cookie("referer").as_deref(), Some("{}"));
//!
//! store.delete_cookie("referer", &CookieAttributes::default());
//! let resp = store.into_response_headers();
//! assert_eq!(resp.get_all(SET_COOKIE).iter().count(), 1);
//! ```
use std::collections::HashMap;

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};

use crate::cookies::store::CookieStore;
use crate::cookies::Cookie;

#[derive(Debug, Clone, Default)]
pub struct HeaderCookieStore {
    /// Cookies sent by the client, decoded.
    request: HashMap<String, String>,
    /// `Set-Cookie` headers collected for the response.
    response: HeaderMap,
}

impl HeaderCookieStore {
    pub fn from_request(headers: &HeaderMap) -> Self {
        let mut request = HashMap::new();

        for header in headers.get_all(COOKIE) {
            let Ok(header_str) = header.to_str() else {
                log::debug!("skipping non-ASCII Cookie header");
                continue;
            };

            for pair in header_str.split(';') {
                if let Some((name, value)) = pair.split_once('=') {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    request
                        .entry(name.to_string())
                        .or_insert_with(|| decode_value(value.trim()));
                }
            }
        }

        Self {
            request,
            response: HeaderMap::new(),
        }
    }

    /// The `Set-Cookie` headers queued so far.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response
    }

    pub fn into_response_headers(self) -> HeaderMap {
        self.response
    }
}

impl CookieStore for HeaderCookieStore {
    fn read_cookie(&self, name: &str) -> Option<String> {
        self.request.get(name).cloned()
    }

    fn write_cookie(&mut self, cookie: Cookie) {
        let header = cookie.to_set_cookie_header();
        match HeaderValue::from_str(&header) {
            Ok(value) => {
                self.response.append(SET_COOKIE, value);
            }
            Err(e) => {
                log::warn!("cannot emit Set-Cookie for \"{}\": {}", cookie.name, e);
            }
        }
    }
}

fn decode_value(raw: &str) -> String {
    let raw = raw.trim_matches('"');
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

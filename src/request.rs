//! Per-request input for the referer tracker.

use http::header::REFERER;
use http::HeaderMap;

/// The parts of an inbound request the tracker looks at.
///
/// Built once per request by the hosting layer. `main_request` is false for
/// internal sub-requests (fragments, forwards) so the lifecycle hook can skip them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    referer: Option<String>,
    main_request: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl RequestContext {
    pub fn new(referer: Option<String>) -> Self {
        Self {
            referer,
            main_request: true,
        }
    }

    pub fn with_referer<S: Into<String>>(referer: S) -> Self {
        Self::new(Some(referer.into()))
    }

    /// A main request without a `Referer` header.
    pub fn empty() -> Self {
        Self {
            referer: None,
            main_request: true,
        }
    }

    /// Reads the `Referer` header. Values that are not visible ASCII are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let referer = headers
            .get(REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            referer,
            main_request: true,
        }
    }

    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self::from_headers(&parts.headers)
    }

    /// Marks this context as an internal sub-request.
    pub fn sub_request(mut self) -> Self {
        self.main_request = false;
        self
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn is_main_request(&self) -> bool {
        self.main_request
    }
}

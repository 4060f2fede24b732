//! Request-scoped referer tracker.
//!
//! A [`RefererTracker`] is built once per inbound request from a configuration, a
//! [`CookieStore`] for that request and the request's [`RequestContext`]. The hosting
//! layer calls [`on_request`](RefererTracker::on_request) from its request pipeline;
//! application code later calls [`get`](RefererTracker::get).
//!
//! ```rust
//! use referer_cookie::config::RefererCookieConfig;
//! use referer_cookie::cookies::{CookieStore, InMemoryCookieStore};
//! use referer_cookie::referer::{RefererTracker, RefererValue};
//! use referer_cookie::request::RequestContext;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RefererCookieConfig::builder().internal_domains(["*.example.com"]).build()?;
//! let mut store = InMemoryCookieStore::new();
//! let request = RequestContext::with_referer("https://other.test/y");
//!
//! let mut tracker = RefererTracker::new(cfg, &mut store, request)?;
//! tracker.on_request();
//! assert_eq!(tracker.get(None)?, RefererValue::Single("https://other.test/y".into()));
//! drop(tracker);
//!
//! assert_eq!(
//!     store.read_cookie("referer").as_deref(),
//!     Some(r#"{"referer_external":"https://other.test/y"}"#)
//! );
//! # Ok(()) }
//! ```

use std::collections::BTreeMap;

use crate::clock::{Clock, SystemClock};
use crate::config::{self, RefererCookieConfig};
use crate::cookies::{Cookie, CookieAttributes, CookieStore, MAX_EXPIRES};
use crate::errors::RefererError;
use crate::referer::matcher::{referer_host, Classification, DomainMatcher};
use crate::referer::payload::{RefererKey, RefererPayload};
use crate::request::RequestContext;

/// Result of [`RefererTracker::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefererValue {
    /// The external referer, returned directly when internal tracking is off.
    Single(String),
    /// Every observed referer keyed by wire name.
    All(BTreeMap<String, String>),
    /// The value stored under a requested key.
    Key(Option<String>),
}

impl RefererValue {
    /// The single string this value carries, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RefererValue::Single(v) => Some(v),
            RefererValue::Key(v) => v.as_deref(),
            RefererValue::All(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Uninitialized,
    Ready(RefererPayload),
}

pub struct RefererTracker<S: CookieStore, C: Clock = SystemClock> {
    config: RefererCookieConfig,
    store: S,
    request: RequestContext,
    clock: C,
    state: State,
}

impl<S: CookieStore> RefererTracker<S> {
    /// Creates a tracker for one request. Fails if `config` does not validate.
    pub fn new(config: RefererCookieConfig, store: S, request: RequestContext) -> Result<Self, RefererError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            request,
            clock: SystemClock::new(),
            state: State::Uninitialized,
        })
    }
}

impl<S: CookieStore, C: Clock> RefererTracker<S, C> {
    /// Swaps the time source used for cookie expiry.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RefererTracker<S, C2> {
        RefererTracker {
            config: self.config,
            store: self.store,
            request: self.request,
            clock,
            state: self.state,
        }
    }

    /// Request lifecycle hook. Initializes the tracker for main requests when
    /// `auto_init` is enabled; sub-requests are ignored.
    pub fn on_request(&mut self) {
        if !self.config.auto_init || !self.request.is_main_request() {
            return;
        }
        self.init();
    }

    /// Reads the stored payload, classifies the current referrer and persists the
    /// merged result when there is a new observation. Runs once until the cookie
    /// name changes.
    pub fn init(&mut self) {
        self.ready();
    }

    /// Returns the referer values for this request, initializing first if needed.
    ///
    /// Without a key: the external referer when internal tracking is off and one is
    /// known, otherwise every known value. With a key (`internal`, `referer_external`,
    /// ...): the stored value, or [`RefererError::UnknownKey`] if the key is not tracked
    /// in the current mode.
    pub fn get(&mut self, key: Option<&str>) -> Result<RefererValue, RefererError> {
        let payload = self.ready();

        let Some(key) = key else {
            if !self.config.track_internal_referer {
                if let Some(external) = payload.get(RefererKey::External) {
                    return Ok(RefererValue::Single(external.to_string()));
                }
            }
            return Ok(RefererValue::All(payload.present()));
        };

        let tracked = RefererKey::parse(key).filter(|k| self.tracked_keys().contains(k));
        match tracked {
            Some(k) => Ok(RefererValue::Key(payload.get(k).map(str::to_string))),
            None => Err(RefererError::UnknownKey(RefererKey::qualify(key))),
        }
    }

    pub fn internal(&mut self) -> Result<Option<String>, RefererError> {
        Ok(self.get(Some("internal"))?.as_str().map(str::to_string))
    }

    pub fn external(&mut self) -> Result<Option<String>, RefererError> {
        Ok(self.get(Some("external"))?.as_str().map(str::to_string))
    }

    /// Asks the client to drop the cookie. The values of this request stay readable.
    pub fn clear(&mut self) {
        let attributes = CookieAttributes::from(&self.config);
        self.store.delete_cookie(&self.config.name, &attributes);
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn config(&self) -> &RefererCookieConfig {
        &self.config
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Renames the cookie and drops any computed state.
    pub fn set_cookie_name<N: Into<String>>(&mut self, name: N) -> Result<(), RefererError> {
        let name = name.into();
        config::validate_name(&name)?;
        self.config.name = name;
        self.state = State::Uninitialized;
        Ok(())
    }

    pub fn set_lifetime(&mut self, seconds: i64) -> Result<(), RefererError> {
        config::validate_lifetime(seconds)?;
        self.config.lifetime = seconds;
        Ok(())
    }

    pub fn set_path<P: Into<String>>(&mut self, path: P) {
        self.config.path = path.into();
    }

    pub fn set_domain<D: Into<String>>(&mut self, domain: D) {
        self.config.domain = domain.into();
    }

    pub fn set_secure(&mut self, secure: bool) {
        self.config.secure = secure;
    }

    pub fn set_http_only(&mut self, http_only: bool) {
        self.config.httponly = http_only;
    }

    pub fn set_auto_init(&mut self, auto_init: bool) {
        self.config.auto_init = auto_init;
    }

    pub fn set_track_internal_referer(&mut self, track: bool) {
        self.config.track_internal_referer = track;
    }

    pub fn set_internal_domains(&mut self, patterns: Vec<String>) {
        self.config.internal_domains = patterns;
    }

    pub fn set_external_domains(&mut self, patterns: Vec<String>) {
        self.config.external_domains = patterns;
    }

    fn tracked_keys(&self) -> &'static [RefererKey] {
        if self.config.track_internal_referer {
            &[RefererKey::Internal, RefererKey::External]
        } else {
            &[RefererKey::External]
        }
    }

    /// The payload of this request, computing it first if needed.
    fn ready(&mut self) -> RefererPayload {
        if let State::Ready(payload) = &self.state {
            return payload.clone();
        }

        let mut payload = RefererPayload::default();
        payload.overlay(&self.stored_payload());

        if let Some((key, referer)) = self.observe() {
            payload.set(key, referer);
            self.persist(&payload);
        }

        self.state = State::Ready(payload.clone());
        payload
    }

    fn stored_payload(&self) -> RefererPayload {
        let Some(raw) = self.store.read_cookie(&self.config.name) else {
            return RefererPayload::default();
        };

        RefererPayload::decode(&raw).unwrap_or_else(|| {
            log::warn!("ignoring malformed \"{}\" cookie payload", self.config.name);
            RefererPayload::default()
        })
    }

    /// The slot the current referrer should be written to, if any.
    fn observe(&self) -> Option<(RefererKey, String)> {
        let referer = self.request.referer()?;
        let Some(host) = referer_host(referer) else {
            log::debug!("referer \"{referer}\" has no host, ignoring");
            return None;
        };

        let classification = DomainMatcher::from_config(&self.config).classify(&host);
        log::debug!("referer host \"{host}\" classified as {classification:?}");

        match classification {
            Classification::Internal if self.config.track_internal_referer => {
                Some((RefererKey::Internal, referer.to_string()))
            }
            Classification::External => Some((RefererKey::External, referer.to_string())),
            Classification::Internal | Classification::Untracked => None,
        }
    }

    fn persist(&mut self, payload: &RefererPayload) {
        let cookie = Cookie {
            name: self.config.name.clone(),
            value: payload.encode(),
            expires: self.clock.now().saturating_add(self.config.lifetime).min(MAX_EXPIRES),
            attributes: CookieAttributes::from(&self.config),
        };
        log::debug!("persisting referer cookie \"{}\" until {}", cookie.name, cookie.expires);
        self.store.write_cookie(cookie);
    }
}

// src/referer.rs
//! Referer classification and persistence: [`RefererTracker`], [`DomainMatcher`]
//! and the [`RefererPayload`] stored in the cookie.

mod matcher;
mod payload;
mod tracker;

pub use matcher::referer_host;
pub use matcher::Classification;
pub use matcher::DomainMatcher;
pub use matcher::DomainPattern;

pub use payload::RefererKey;
pub use payload::RefererPayload;

pub use tracker::RefererTracker;
pub use tracker::RefererValue;

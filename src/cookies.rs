// src/cookies.rs
//! Cookies: the [`Cookie`] record, the [`CookieStore`] trait and its backends.

mod cookies;
mod store;

pub use cookies::Cookie;
pub use cookies::CookieAttributes;
pub use cookies::MAX_EXPIRES;

pub use store::CookieStore;
pub use store::HeaderCookieStore;
pub use store::InMemoryCookieStore;

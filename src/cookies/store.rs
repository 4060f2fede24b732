//! Cookie store infrastructure.
//!
//! A **cookie store** is the transport the tracker uses to reach the client's cookies
//! for the duration of one request:
//! - `read_cookie` returns the raw value the client sent (already transport-decoded,
//!   but not JSON-decoded).
//! - `write_cookie` / `delete_cookie` queue an update for the response.
//!
//! This module exports two implementations:
//! - [`InMemoryCookieStore`]: a map plus a write log (embedding and tests).
//! - [`HeaderCookieStore`]: reads the request `Cookie` header and collects
//!   `Set-Cookie` headers for the response.
//!
//! ## Design notes
//! - Stores are request-scoped; nothing here is shared between requests.
//! - I/O is infallible from the tracker's point of view. A store that cannot honour a
//!   write logs it and moves on.
mod header;
mod in_memory;

use crate::cookies::{Cookie, CookieAttributes};

pub use header::HeaderCookieStore;
pub use in_memory::InMemoryCookieStore;

/// Read and write access to the client's cookies for a single request.
pub trait CookieStore {
    /// Returns the raw value of cookie `name`, if the client sent one.
    fn read_cookie(&self, name: &str) -> Option<String>;

    /// Queues `cookie` to be sent back to the client.
    fn write_cookie(&mut self, cookie: Cookie);

    /// Queues a removal of cookie `name`.
    ///
    /// The default writes an empty value that expired before the epoch.
    fn delete_cookie(&mut self, name: &str, attributes: &CookieAttributes) {
        self.write_cookie(Cookie::removal(name, attributes));
    }
}

impl<S: CookieStore + ?Sized> CookieStore for &mut S {
    fn read_cookie(&self, name: &str) -> Option<String> {
        (**self).read_cookie(name)
    }

    fn write_cookie(&mut self, cookie: Cookie) {
        (**self).write_cookie(cookie)
    }

    fn delete_cookie(&mut self, name: &str, attributes: &CookieAttributes) {
        (**self).delete_cookie(name, attributes)
    }
}

impl<S: CookieStore + ?Sized> CookieStore for Box<S> {
    fn read_cookie(&self, name: &str) -> Option<String> {
        (**self).read_cookie(name)
    }

    fn write_cookie(&mut self, cookie: Cookie) {
        (**self).write_cookie(cookie)
    }

    fn delete_cookie(&mut self, name: &str, attributes: &CookieAttributes) {
        (**self).delete_cookie(name, attributes)
    }
}

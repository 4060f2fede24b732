pub mod clock;
pub mod config;
pub mod cookies;
pub mod errors;
pub mod referer;
pub mod request;

pub use config::RefererCookieConfig;
pub use errors::RefererError;
pub use referer::{RefererTracker, RefererValue};
pub use request::RequestContext;

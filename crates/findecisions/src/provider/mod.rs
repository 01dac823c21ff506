//! External auth provider client.

pub mod http;

pub use http::{HttpAuthProvider, SESSION_COOKIE_NAME};

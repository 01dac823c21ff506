mod provider;
mod service;

pub use provider::{AuthProvider, ProviderError, ProviderResponse};
pub use service::{AuthService, PENDING_MARKER_TTL_SECONDS};

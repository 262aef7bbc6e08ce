pub mod auth;
pub mod metrics;
pub mod security_headers;

pub use auth::AuthMiddleware;
pub use metrics::count_requests;
pub use security_headers::SecurityHeaders;

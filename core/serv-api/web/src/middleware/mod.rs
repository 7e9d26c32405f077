pub mod auth;
pub mod cors;

pub use auth::{ApiKeyAuth, ApiKeyAuthMiddleware};
pub use cors::CorsConfig;

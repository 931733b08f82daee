//! Wallet Sentry HTTP API Module
//! REST boundary over the address analysis pipeline

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use middleware::{spawn_cleanup_task, RateLimitConfig, RateLimiter};
pub use routes::create_router;
pub use types::*;

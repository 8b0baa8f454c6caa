pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Settings;
pub use errors::{ApiError, ConfigError, ParseError, UpstreamError};
pub use models::{AppState, CacheEntry, UsageRecord};
pub use routes::routes;

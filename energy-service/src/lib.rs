pub mod api;
pub mod config;
pub mod error;
pub mod metrics_server;
pub mod observability;
pub mod sources;
pub mod transform;

pub use api::{create_router, AppState};
pub use error::ApiError;

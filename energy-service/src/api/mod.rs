pub mod handlers;
pub mod models;
mod routes;

use std::sync::Arc;

use energy_store::ReadingStore;

pub use routes::create_router;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReadingStore>,
}

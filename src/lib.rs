pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::ReadCache;

/// Shared per-process state handed to every handler.
pub struct AppState<S, D> {
    pub store: S,
    pub directory: D,
    pub cache: ReadCache,
}

impl<S, D> AppState<S, D> {
    pub fn new(store: S, directory: D, cache: ReadCache) -> Self {
        Self {
            store,
            directory,
            cache,
        }
    }
}

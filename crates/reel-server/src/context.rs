//! Shared application context.
//!
//! [`AppContext`] is handed to every route handler via Axum state. It only
//! holds `Arc`s, so cloning it per request is cheap, and everything it
//! points at is read-only once the server is running.

use std::sync::Arc;

use reel_core::config::Config;

use crate::library::{Catalog, SqliteLibrary, UserDirectory, WatchedStatusStore};

#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    pub catalog: Arc<dyn Catalog>,
    pub users: Arc<dyn UserDirectory>,
    pub watched: Arc<dyn WatchedStatusStore>,
}

impl AppContext {
    /// Build a context whose collaborators are all backed by `library`.
    pub fn new(config: Config, library: SqliteLibrary) -> Self {
        let library = Arc::new(library);
        Self {
            config: Arc::new(config),
            catalog: library.clone(),
            users: library.clone(),
            watched: library,
        }
    }
}

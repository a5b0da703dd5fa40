// Application state module
// Holds the configuration and the handles shared by every connection

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::content::ContentStore;
use crate::database::Database;

/// Application state
pub struct AppState {
    pub config: Config,
    pub content: ContentStore,
    pub database: Arc<Database>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create `AppState` from configuration and an already-created database handle
    pub fn new(config: &Config, database: Arc<Database>) -> Self {
        Self {
            content: ContentStore::new(&config.content.root, &config.content.default_language),
            database,
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
            config: config.clone(),
        }
    }
}

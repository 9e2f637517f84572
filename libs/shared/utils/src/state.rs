use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::Database;

/// Per-process context handed to every router: configuration plus the
/// storage client. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

use std::sync::Arc;

use roster_db::storage::Storage;

use crate::config::RosterApiConfig;

/// Shared state handed to every handler. Built once at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<RosterApiConfig>,
    pub db: Arc<dyn Storage>,
}

impl ApiContext {
    pub fn new(config: RosterApiConfig, db: Arc<dyn Storage>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

use std::sync::Arc;

use storage::Database;

use crate::config::Config;
use crate::features::participants::hub::SnapshotHub;
use crate::startgg::StartggClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub startgg: StartggClient,
    pub hub: SnapshotHub,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            startgg: StartggClient::new(),
            hub: SnapshotHub::default(),
        }
    }
}

use std::sync::Arc;

use common::storage::EntityStore;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::repository::Repositories;

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: AppConfig,
}

impl AppState {
    /// Build the repositories over `store`. Cancelling `shutdown` stops
    /// in-flight cascading deletes before their next step.
    pub fn new(
        store: Arc<dyn EntityStore>,
        config: AppConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            repos: Repositories::new(store, &config.store, shutdown),
            config,
        }
    }
}

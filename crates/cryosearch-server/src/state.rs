//! Shared application state.

use std::sync::Arc;

use cryosearch::CompoundSearcher;

use crate::config::ServerConfig;

/// Everything a handler needs: the search service and the server settings.
#[derive(Clone)]
pub struct AppState {
    searcher: Arc<CompoundSearcher>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(searcher: Arc<CompoundSearcher>, config: ServerConfig) -> Self {
        Self {
            searcher,
            config: Arc::new(config),
        }
    }

    pub fn searcher(&self) -> &CompoundSearcher {
        &self.searcher
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

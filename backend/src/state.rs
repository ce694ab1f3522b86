//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::AppConfig;
use crate::repositories::{InMemoryProfileStore, ProfileStore};
use std::sync::Arc;

/// Shared application state
///
/// All fields are behind `Arc`, so cloning per request is O(1).
#[derive(Clone)]
pub struct AppState {
    /// Profile and intake storage
    pub store: Arc<dyn ProfileStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn ProfileStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// State backed by the in-memory store
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Arc::new(InMemoryProfileStore::new()), config)
    }

    /// Get a reference to the profile store
    #[inline]
    pub fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let state = AppState::in_memory(AppConfig::default());
        let cloned = state.clone();

        let record = state.store().create().await.unwrap();
        assert!(cloned.store().find(record.id).await.unwrap().is_some());
        assert_eq!(cloned.config().server.port, 8080);
    }
}

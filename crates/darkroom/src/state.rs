//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The backing store is selected at compile time via
//! feature flags and hidden behind the [`PortfolioRepository`].

use std::sync::Arc;

use darkroom_core::storage::{PortfolioRepository, TableStore};

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!("Cannot enable both 'inmemory' and 'dynamodb' storage features");

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'dynamodb'");

/// Shared application state.
///
/// This is cloned for each request handler and contains the portfolio
/// repository over the active backing store.
#[derive(Clone)]
pub struct AppState {
    /// Portfolio repository (projects, images, carousel).
    pub repository: Arc<PortfolioRepository>,
}

impl AppState {
    /// Creates a new AppState over the given backing store.
    fn build(store: Arc<dyn TableStore>) -> Self {
        Self {
            repository: Arc::new(PortfolioRepository::new(store)),
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_state {
    use super::*;
    use darkroom_core::storage::MemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for local development and tests without external dependencies.
        pub async fn new(_config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(MemoryStore::new());

            Ok(Self::build(store))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_state {
    use super::*;
    use crate::storage::DynamoDbStore;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        ///
        /// Credentials and region come from the standard AWS environment.
        /// `DYNAMODB_ENDPOINT_URL` redirects the client to a local instance.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(endpoint) = &config.dynamodb_endpoint_url {
                loader = loader.endpoint_url(endpoint);
            }

            let aws_config = loader.load().await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            let store = Arc::new(DynamoDbStore::new(client, &config.dynamodb_table_name));

            Ok(Self::build(store))
        }
    }
}

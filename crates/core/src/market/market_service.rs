//! Market service.
//!
//! Thin pass-through to the estimation crate for the surfaces that are
//! not per-holding: fund search (originates new holdings), NAV history
//! (charts), and the watched-index overview. Unlike the quote adapter
//! these surfaces propagate errors; the caller asked explicitly and
//! deserves to know why nothing came back.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fundlens_market_data::{ExchangeSnapshot, FundEstimator, FundSearchResult, NavPoint};

use crate::settings::MarketConfig;
use crate::store::{AppStore, KeyValueStore};
use crate::Result;

/// Trait defining the contract for market-level operations.
#[async_trait]
pub trait MarketServiceTrait: Send + Sync {
    /// Search funds by code, name or pinyin fragment.
    async fn search_funds(&self, query: &str) -> Result<Vec<FundSearchResult>>;

    /// Settled NAV series for one fund, oldest first.
    async fn nav_history(&self, code: &str, days: usize) -> Result<Vec<NavPoint>>;

    /// Live snapshots of the configured watched indices.
    async fn market_overview(&self) -> Result<Vec<ExchangeSnapshot>>;

    /// Replace the watched index list.
    async fn set_watched_indices(&self, indices: Vec<String>) -> Result<MarketConfig>;
}

/// Market service over the shared store and the estimation chain.
pub struct MarketService<S: KeyValueStore> {
    store: Arc<RwLock<AppStore<S>>>,
    estimator: Arc<FundEstimator>,
}

impl<S: KeyValueStore> MarketService<S> {
    pub fn new(store: Arc<RwLock<AppStore<S>>>, estimator: Arc<FundEstimator>) -> Self {
        Self { store, estimator }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> MarketServiceTrait for MarketService<S> {
    async fn search_funds(&self, query: &str) -> Result<Vec<FundSearchResult>> {
        Ok(self.estimator.search(query).await?)
    }

    async fn nav_history(&self, code: &str, days: usize) -> Result<Vec<NavPoint>> {
        Ok(self.estimator.nav_history(code, days).await?)
    }

    async fn market_overview(&self) -> Result<Vec<ExchangeSnapshot>> {
        let codes = self
            .store
            .read()
            .await
            .market_config()
            .watched_indices
            .clone();
        Ok(self.estimator.market_overview(&codes).await?)
    }

    async fn set_watched_indices(&self, indices: Vec<String>) -> Result<MarketConfig> {
        let mut store = self.store.write().await;
        let config = MarketConfig {
            watched_indices: indices,
        };
        store.set_market_config(config.clone())?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStore;
    use tempfile::TempDir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_watched_indices_persists() {
        let dir = TempDir::new().unwrap();
        let file_store = Arc::new(FileStore::open(dir.path()).unwrap());
        let app_store = Arc::new(RwLock::new(AppStore::load(file_store.clone()).unwrap()));
        let service = MarketService::new(app_store, Arc::new(FundEstimator::new()));

        let config = service
            .set_watched_indices(vec!["1.000300".to_string()])
            .await
            .unwrap();
        assert_eq!(config.watched_indices, vec!["1.000300".to_string()]);

        // visible after a cold reload
        let reloaded = AppStore::load(file_store).unwrap();
        assert_eq!(
            reloaded.market_config().watched_indices,
            vec!["1.000300".to_string()]
        );
    }
}

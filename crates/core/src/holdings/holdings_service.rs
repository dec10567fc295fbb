//! Holdings service - orchestrates the store, the ledger and the
//! refresh coordinator.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};

use crate::ledger::{apply_transaction, seed_transaction, NewTransaction};
use crate::portfolio::{
    allocation_by_tag, group_stats, portfolio_totals, GroupStats, PortfolioTotals, TagAllocation,
};
use crate::quotes::RefreshService;
use crate::store::{AppStore, KeyValueStore};
use crate::{Error, Result};

use super::{Holding, HoldingUpdate, HoldingsServiceTrait, NewHolding};

/// Holdings service over the shared application store.
pub struct HoldingsService<S: KeyValueStore> {
    store: Arc<RwLock<AppStore<S>>>,
    refresh: Arc<RefreshService>,
    /// Guards against overlapping portfolio refreshes: the coordinator
    /// is not re-entrant, so a second request while one is in flight is
    /// skipped rather than queued.
    refresh_gate: Mutex<()>,
}

impl<S: KeyValueStore> HoldingsService<S> {
    pub fn new(store: Arc<RwLock<AppStore<S>>>, refresh: Arc<RefreshService>) -> Self {
        Self {
            store,
            refresh,
            refresh_gate: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> HoldingsServiceTrait for HoldingsService<S> {
    async fn list_holdings(&self) -> Vec<Holding> {
        self.store.read().await.holdings().to_vec()
    }

    async fn get_holding(&self, holding_id: &str) -> Result<Holding> {
        self.store
            .read()
            .await
            .get_holding(holding_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("holding {}", holding_id)))
    }

    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate()?;

        let now = Utc::now();
        let mut holding = Holding::new(&new_holding, now);
        if new_holding.shares > Decimal::ZERO {
            let seed = seed_transaction(new_holding.shares, new_holding.average_cost, now);
            holding = apply_transaction(&holding, &seed);
        }

        self.store.write().await.insert_holding(holding.clone())?;
        info!(
            "created holding {} ({} shares)",
            holding.id, holding.shares
        );

        // Refresh the one new holding immediately, awaited; mutation and
        // refresh are properly sequenced so no delay tricks are needed.
        let refreshed = self.refresh.refresh_one(&holding).await;
        self.store.write().await.replace_holding(refreshed.clone())?;
        Ok(refreshed)
    }

    async fn update_holding(&self, holding_id: &str, update: HoldingUpdate) -> Result<Holding> {
        let mut store = self.store.write().await;
        let holding = store
            .get_holding(holding_id)
            .ok_or_else(|| Error::NotFound(format!("holding {}", holding_id)))?;

        if let Some(group_id) = &update.group_id {
            if store.get_group(group_id).is_none() {
                return Err(Error::NotFound(format!("group {}", group_id)));
            }
        }

        let updated = update.apply(holding);
        store.replace_holding(updated.clone())?;
        Ok(updated)
    }

    async fn record_transaction(
        &self,
        holding_id: &str,
        transaction: NewTransaction,
    ) -> Result<Holding> {
        transaction.validate()?;

        let mut store = self.store.write().await;
        let holding = store
            .get_holding(holding_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("holding {}", holding_id)))?;

        let entry = transaction.into_transaction();
        let mut updated = apply_transaction(&holding, &entry);
        // buying into a watchlist entry turns it into a real position
        if updated.shares > Decimal::ZERO {
            updated.is_watchlist_only = false;
        }

        store.replace_holding(updated.clone())?;
        Ok(updated)
    }

    async fn delete_holding(&self, holding_id: &str) -> Result<()> {
        self.store.write().await.remove_holding(holding_id)?;
        Ok(())
    }

    async fn refresh_portfolio(&self) -> Result<bool> {
        // Single in-flight refresh: skip, don't queue.
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            warn!("portfolio refresh already in flight, skipping");
            return Ok(false);
        };

        // Snapshot under the read lock, fan out without holding it, and
        // apply the settled results as one atomic replacement.
        let snapshot = self.store.read().await.holdings().to_vec();
        let refreshed = self.refresh.refresh_all(&snapshot).await;
        self.store.write().await.replace_all_holdings(refreshed)?;
        Ok(true)
    }

    async fn group_statistics(&self) -> Vec<GroupStats> {
        let store = self.store.read().await;
        group_stats(store.groups(), store.holdings())
    }

    async fn totals(&self) -> PortfolioTotals {
        portfolio_totals(self.store.read().await.holdings())
    }

    async fn tag_allocations(&self) -> Vec<TagAllocation> {
        allocation_by_tag(self.store.read().await.holdings())
    }
}

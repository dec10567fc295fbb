//! Holdings service trait.

use async_trait::async_trait;

use crate::ledger::NewTransaction;
use crate::portfolio::{GroupStats, PortfolioTotals, TagAllocation};

use super::{Holding, HoldingUpdate, NewHolding};
use crate::Result;

/// Trait defining the contract for holdings operations.
///
/// This is the engine's mutation API: shells call these operations and
/// read the derived snapshots; they never touch entities directly.
#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    /// Snapshot of the current holdings collection.
    async fn list_holdings(&self) -> Vec<Holding>;

    /// Fetch one holding.
    async fn get_holding(&self, holding_id: &str) -> Result<Holding>;

    /// Create a holding. A nonzero starting position is seeded with its
    /// implicit first BUY; zero shares create a watchlist-only entry.
    /// The new holding is refreshed once, awaited, before returning.
    async fn create_holding(&self, new_holding: NewHolding) -> Result<Holding>;

    /// Edit a holding's descriptive fields.
    async fn update_holding(&self, holding_id: &str, update: HoldingUpdate) -> Result<Holding>;

    /// Record a buy/sell against a holding's ledger.
    async fn record_transaction(
        &self,
        holding_id: &str,
        transaction: NewTransaction,
    ) -> Result<Holding>;

    /// Delete a holding.
    async fn delete_holding(&self, holding_id: &str) -> Result<()>;

    /// Refresh every holding against the quote sources. Returns `false`
    /// when another refresh was already in flight and this one was
    /// skipped.
    async fn refresh_portfolio(&self) -> Result<bool>;

    /// Per-group aggregates over the current state.
    async fn group_statistics(&self) -> Vec<GroupStats>;

    /// Portfolio-wide totals over the current state.
    async fn totals(&self) -> PortfolioTotals;

    /// Market value by primary tag.
    async fn tag_allocations(&self) -> Vec<TagAllocation>;
}

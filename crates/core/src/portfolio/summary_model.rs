//! Aggregate view models. All derived, recomputed on every state
//! change, never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Roll-up of one group's holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub group_id: String,
    pub name: String,
    pub is_default: bool,
    pub market_value: Decimal,
    pub today_profit: Decimal,
    pub cumulative_return: Decimal,
    /// Number of holdings with an actual position (watchlist entries
    /// and sold-out positions do not count).
    pub count: usize,
}

/// Portfolio-wide totals, independent of grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub market_value: Decimal,
    pub today_profit: Decimal,
    pub cumulative_return: Decimal,
    pub count: usize,
}

/// Market value attributed to one tag bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAllocation {
    pub tag: String,
    pub market_value: Decimal,
}

//! Portfolio module - derived aggregates over holdings and groups.

mod summary_model;
mod summary_service;


pub use summary_model::{GroupStats, PortfolioTotals, TagAllocation};
pub use summary_service::{allocation_by_tag, group_stats, portfolio_totals};

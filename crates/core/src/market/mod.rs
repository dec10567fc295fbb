//! Market module - engine-side surface over the market-data crate.

mod market_service;

pub use market_service::{MarketService, MarketServiceTrait};

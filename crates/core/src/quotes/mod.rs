//! Quotes module - the never-throw source adapter and the batch refresh
//! coordinator.

mod client;
mod refresh;


pub use client::{EstimatorQuoteSource, QuoteSourceTrait};
pub use refresh::RefreshService;

//! Holdings module - domain models, service, and traits.

mod holdings_model;
mod holdings_service;
mod holdings_traits;


pub use holdings_model::{compose_holding_id, Holding, HoldingUpdate, NewHolding};
pub use holdings_service::HoldingsService;
pub use holdings_traits::HoldingsServiceTrait;

//! Domain models shared across providers and the estimator.

mod quote;
mod search;
mod snapshot;
mod types;

pub use quote::FundQuote;
pub use search::FundSearchResult;
pub use snapshot::{ConstituentWeight, ExchangeSnapshot, NavPoint};
pub use types::MarketPhase;

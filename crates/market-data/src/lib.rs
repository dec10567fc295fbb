//! Fundlens Market Data - upstream quote sources for open-end funds.
//!
//! This crate knows how to talk to the fund data upstreams and how to
//! distill their heterogeneous, often partial payloads into a single
//! [`FundQuote`] per instrument. It has no knowledge of holdings or
//! portfolios; the `fundlens-core` crate consumes it through
//! [`FundEstimator`].
//!
//! # Architecture
//!
//! ```text
//! FundEstimator
//!       │
//!       ├─► FundDataProvider (official estimate, search, NAV history)
//!       ├─► ExchangeProvider (listed-instrument snapshots)
//!       └─► proxy map (fund name → listed proxy)
//! ```

pub mod errors;
pub mod estimator;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use estimator::FundEstimator;
pub use models::{
    ConstituentWeight, ExchangeSnapshot, FundQuote, FundSearchResult, MarketPhase, NavPoint,
};
pub use provider::FundDataProvider;

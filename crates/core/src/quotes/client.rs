//! Quote source adapter.
//!
//! The engine-facing contract is deliberately impossible to fail: one
//! instrument code in, an optional quote out. Every failure mode of the
//! underlying estimation chain - timeout, network error, malformed
//! payload, unknown symbol - collapses to `None` here, and the affected
//! holding simply keeps its last good valuation until the next refresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;

use fundlens_market_data::{FundEstimator, FundQuote};

/// Adapter budget on top of the per-request timeouts inside the
/// estimation chain, so a pathological chain (several slow upstream
/// calls in sequence) still settles.
const DEFAULT_FETCH_BUDGET: Duration = Duration::from_secs(15);

/// Never-throw quote source.
#[async_trait]
pub trait QuoteSourceTrait: Send + Sync {
    /// Fetch the freshest quote for one instrument, or `None` when the
    /// upstreams had nothing usable. Must not panic and must not block
    /// beyond its internal budget.
    async fn fetch_quote(&self, instrument_code: &str) -> Option<FundQuote>;
}

/// Production quote source: the market-data estimation chain behind a
/// timeout and a swallow-everything boundary.
pub struct EstimatorQuoteSource {
    estimator: Arc<FundEstimator>,
    budget: Duration,
}

impl EstimatorQuoteSource {
    pub fn new(estimator: Arc<FundEstimator>) -> Self {
        Self {
            estimator,
            budget: DEFAULT_FETCH_BUDGET,
        }
    }

    pub fn with_budget(estimator: Arc<FundEstimator>, budget: Duration) -> Self {
        Self { estimator, budget }
    }
}

#[async_trait]
impl QuoteSourceTrait for EstimatorQuoteSource {
    async fn fetch_quote(&self, instrument_code: &str) -> Option<FundQuote> {
        match tokio::time::timeout(self.budget, self.estimator.estimate(instrument_code)).await {
            Ok(Ok(quote)) => Some(quote),
            Ok(Err(e)) => {
                warn!("quote fetch for {} failed: {}", instrument_code, e);
                None
            }
            Err(_) => {
                warn!(
                    "quote fetch for {} exceeded {:?} budget",
                    instrument_code, self.budget
                );
                None
            }
        }
    }
}

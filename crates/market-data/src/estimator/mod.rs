//! Fund estimation chain.
//!
//! One fund, one call, one merged [`FundQuote`]. The chain tries, in
//! order, whatever signal the market is currently able to give:
//!
//! 1. `OFFICIAL_CLOSE`: outside trading hours the settled NAV is the
//!    whole truth; the estimate is pinned to it.
//! 2. `OFFICIAL`: the upstream's own intraday estimate, accepted only
//!    when it actually moves (a dead-flat reading usually means the
//!    upstream stopped estimating this fund).
//! 3. `PROXY_<code>`: the live change of an exchange-listed proxy ETF
//!    matched by fund name keyword.
//! 4. `HOLDINGS`: weight-normalized live change of the fund's reported
//!    top constituents, damped since the uncovered tail is quieter.
//!
//! Whatever level wins, the partial fields of level 1 (settled NAV,
//! display name) ride along so callers can still reconcile them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{ConstituentWeight, ExchangeSnapshot, FundQuote, FundSearchResult, MarketPhase, NavPoint};
use crate::provider::proxy_map::find_proxy;
use crate::provider::{EastmoneyProvider, ExchangeProvider, FundDataProvider};

/// Source tags stamped onto quotes.
pub const SOURCE_OFFICIAL: &str = "OFFICIAL";
pub const SOURCE_OFFICIAL_CLOSE: &str = "OFFICIAL_CLOSE";
pub const SOURCE_HOLDINGS: &str = "HOLDINGS";

/// Default secids for the market overview when no watchlist is
/// configured: SSE Composite and SZSE Component.
pub const DEFAULT_OVERVIEW_CODES: [&str; 2] = ["1.000001", "0.399001"];

const ESTIMATE_TTL: Duration = Duration::from_secs(60);
const CONSTITUENTS_TTL: Duration = Duration::from_secs(3 * 86_400);

/// |change| below this is treated as "the upstream is not estimating".
fn flat_epsilon() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

/// Damping applied to the constituents-derived change; the reported
/// top-10 never covers the whole book.
fn coverage_damping() -> Decimal {
    Decimal::new(95, 2) // 0.95
}

struct CachedQuote {
    quote: FundQuote,
    expires_at: Instant,
}

struct CachedConstituents {
    constituents: Vec<ConstituentWeight>,
    expires_at: Instant,
}

/// Derive an estimated unit value from a settled reference and a change
/// in percent.
fn derive_estimate(reference: Decimal, change_percent: Decimal) -> Decimal {
    reference * (Decimal::ONE + change_percent / Decimal::ONE_HUNDRED)
}

/// Weight-normalized change across the constituents we have live data
/// for; weights of constituents without a live quote still dilute the
/// result (their change counts as zero).
fn weighted_change(
    constituents: &[ConstituentWeight],
    changes: &std::collections::HashMap<String, Decimal>,
) -> Option<Decimal> {
    let mut acc = Decimal::ZERO;
    let mut total_weight = Decimal::ZERO;
    for c in constituents {
        let change = changes.get(&c.code).copied().unwrap_or(Decimal::ZERO);
        acc += change * c.weight_percent;
        total_weight += c.weight_percent;
    }
    if total_weight > Decimal::ZERO {
        Some(acc / total_weight * coverage_damping())
    } else {
        None
    }
}

/// Fund estimator: facade over the providers plus short-lived caches.
pub struct FundEstimator {
    provider: Arc<dyn FundDataProvider>,
    exchange: ExchangeProvider,
    estimate_cache: DashMap<String, CachedQuote>,
    constituents_cache: DashMap<String, CachedConstituents>,
}

impl FundEstimator {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(EastmoneyProvider::new()))
    }

    /// Build an estimator over a custom provider (tests, alternative
    /// upstreams).
    pub fn with_provider(provider: Arc<dyn FundDataProvider>) -> Self {
        Self {
            provider,
            exchange: ExchangeProvider::new(),
            estimate_cache: DashMap::new(),
            constituents_cache: DashMap::new(),
        }
    }

    /// Produce the freshest merged quote for one fund.
    pub async fn estimate(&self, code: &str) -> Result<FundQuote, MarketDataError> {
        self.estimate_at(code, MarketPhase::current()).await
    }

    /// Same as [`estimate`](Self::estimate) with an explicit phase.
    pub async fn estimate_at(
        &self,
        code: &str,
        phase: MarketPhase,
    ) -> Result<FundQuote, MarketDataError> {
        if let Some(hit) = self.cached_estimate(code) {
            return Ok(hit);
        }

        let mut quote = self.provider.latest_estimate(code).await?;

        if quote.reference_value.is_none() {
            self.backfill_reference(code, &mut quote).await;
        }

        if phase.uses_settled_value() {
            self.settle(&mut quote);
        } else {
            let moving = quote.has_live_estimate()
                && quote
                    .estimated_change_percent
                    .map(|c| c.abs() > flat_epsilon())
                    .unwrap_or(false);

            if moving {
                quote.source = Some(SOURCE_OFFICIAL.to_string());
            } else {
                self.estimate_from_proxy(code, &mut quote).await;
                if quote.source.is_none() {
                    self.estimate_from_constituents(code, &mut quote).await;
                }
                // Nothing better: whatever the official endpoint gave
                // stands, flat as it is.
                if quote.source.is_none() && quote.estimated_value.is_some() {
                    quote.source = Some(SOURCE_OFFICIAL.to_string());
                }
            }
        }

        if quote.estimated_value.is_some() {
            self.estimate_cache.insert(
                code.to_string(),
                CachedQuote {
                    quote: quote.clone(),
                    expires_at: Instant::now() + ESTIMATE_TTL,
                },
            );
        }

        Ok(quote)
    }

    /// Live snapshots of the watched indices.
    pub async fn market_overview(
        &self,
        codes: &[String],
    ) -> Result<Vec<ExchangeSnapshot>, MarketDataError> {
        if codes.is_empty() {
            let defaults: Vec<String> =
                DEFAULT_OVERVIEW_CODES.iter().map(|c| c.to_string()).collect();
            return self.exchange.snapshots(&defaults).await;
        }
        self.exchange.snapshots(codes).await
    }

    /// Search funds on the underlying provider.
    pub async fn search(&self, query: &str) -> Result<Vec<FundSearchResult>, MarketDataError> {
        self.provider.search(query).await
    }

    /// Settled NAV series from the underlying provider, oldest first.
    pub async fn nav_history(
        &self,
        code: &str,
        days: usize,
    ) -> Result<Vec<NavPoint>, MarketDataError> {
        self.provider.nav_history(code, days).await
    }

    fn cached_estimate(&self, code: &str) -> Option<FundQuote> {
        let entry = self.estimate_cache.get(code)?;
        if Instant::now() < entry.expires_at {
            Some(entry.quote.clone())
        } else {
            drop(entry);
            self.estimate_cache.remove(code);
            None
        }
    }

    /// Outside trading hours the settled value is authoritative.
    fn settle(&self, quote: &mut FundQuote) {
        if let Some(reference) = quote.reference_value {
            quote.estimated_value = Some(reference);
            quote.estimated_change_percent = Some(Decimal::ZERO);
            quote.source = Some(SOURCE_OFFICIAL_CLOSE.to_string());
        } else if quote.estimated_value.is_some() {
            quote.source = Some(SOURCE_OFFICIAL.to_string());
        }
    }

    /// Pull the latest settled NAV when the estimate endpoint had none.
    async fn backfill_reference(&self, code: &str, quote: &mut FundQuote) {
        match self.provider.nav_history(code, 1).await {
            Ok(points) => {
                if let Some(latest) = points.last() {
                    quote.reference_value = Some(latest.value);
                    quote.reference_date = Some(latest.date);
                }
            }
            Err(e) => debug!("NAV backfill for {} unavailable: {}", code, e),
        }
    }

    async fn estimate_from_proxy(&self, code: &str, quote: &mut FundQuote) {
        let name = quote.display_name.as_deref().unwrap_or("");
        let Some(proxy) = find_proxy(code, name) else {
            return;
        };
        let Some(reference) = quote.reference_value else {
            return;
        };

        match self.exchange.batch_changes(&[proxy.clone()]).await {
            Ok(changes) => {
                if let Some(change) = changes.get(&proxy) {
                    quote.estimated_value = Some(derive_estimate(reference, *change));
                    quote.estimated_change_percent = Some(*change);
                    quote.source = Some(format!("PROXY_{}", proxy));
                }
            }
            Err(e) => warn!("proxy quote {} for {} failed: {}", proxy, code, e),
        }
    }

    async fn estimate_from_constituents(&self, code: &str, quote: &mut FundQuote) {
        let Some(reference) = quote.reference_value else {
            return;
        };
        let constituents = self.constituents(code).await;
        if constituents.is_empty() {
            return;
        }

        let stock_codes: Vec<String> = constituents.iter().map(|c| c.code.clone()).collect();
        let changes = match self.exchange.batch_changes(&stock_codes).await {
            Ok(changes) => changes,
            Err(e) => {
                warn!("constituent quotes for {} failed: {}", code, e);
                return;
            }
        };

        if let Some(change) = weighted_change(&constituents, &changes) {
            quote.estimated_value = Some(derive_estimate(reference, change));
            quote.estimated_change_percent = Some(change);
            quote.source = Some(SOURCE_HOLDINGS.to_string());
        }
    }

    async fn constituents(&self, code: &str) -> Vec<ConstituentWeight> {
        if let Some(entry) = self.constituents_cache.get(code) {
            if Instant::now() < entry.expires_at {
                return entry.constituents.clone();
            }
        }

        match self.provider.top_holdings(code).await {
            Ok(constituents) => {
                self.constituents_cache.insert(
                    code.to_string(),
                    CachedConstituents {
                        constituents: constituents.clone(),
                        expires_at: Instant::now() + CONSTITUENTS_TTL,
                    },
                );
                constituents
            }
            Err(e) => {
                debug!("constituents for {} unavailable: {}", code, e);
                Vec::new()
            }
        }
    }
}

impl Default for FundEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_derive_estimate() {
        assert_eq!(derive_estimate(dec!(2.0), dec!(1.5)), dec!(2.030));
        assert_eq!(derive_estimate(dec!(1.0), dec!(-2.0)), dec!(0.980));
    }

    #[test]
    fn test_weighted_change_dilutes_missing_quotes() {
        let constituents = vec![
            ConstituentWeight {
                code: "600519".to_string(),
                weight_percent: dec!(8.0),
            },
            ConstituentWeight {
                code: "000858".to_string(),
                weight_percent: dec!(2.0),
            },
        ];
        let mut changes = HashMap::new();
        changes.insert("600519".to_string(), dec!(2.0));
        // 000858 has no live quote: (2.0*8 + 0*2) / 10 * 0.95
        assert_eq!(
            weighted_change(&constituents, &changes),
            Some(dec!(1.52))
        );
    }

    #[test]
    fn test_weighted_change_empty_constituents() {
        assert_eq!(weighted_change(&[], &HashMap::new()), None);
    }

    struct StubProvider {
        quote: FundQuote,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FundDataProvider for StubProvider {
        fn id(&self) -> &'static str {
            "STUB"
        }

        async fn latest_estimate(&self, _code: &str) -> Result<FundQuote, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.quote.clone())
        }
    }

    fn full_quote() -> FundQuote {
        FundQuote {
            reference_value: Some(dec!(3.1420)),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 3),
            estimated_value: Some(dec!(3.1671)),
            estimated_change_percent: Some(dec!(0.80)),
            display_name: Some("易方达消费行业股票".to_string()),
            source: None,
        }
    }

    #[tokio::test]
    async fn test_moving_official_estimate_accepted_during_trading() {
        let estimator = FundEstimator::with_provider(Arc::new(StubProvider {
            quote: full_quote(),
            calls: AtomicUsize::new(0),
        }));
        let quote = estimator
            .estimate_at("110022", MarketPhase::Trading)
            .await
            .expect("estimate");
        assert_eq!(quote.source.as_deref(), Some(SOURCE_OFFICIAL));
        assert_eq!(quote.estimated_value, Some(dec!(3.1671)));
        assert_eq!(quote.estimated_change_percent, Some(dec!(0.80)));
    }

    #[tokio::test]
    async fn test_settled_value_wins_when_market_closed() {
        let estimator = FundEstimator::with_provider(Arc::new(StubProvider {
            quote: full_quote(),
            calls: AtomicUsize::new(0),
        }));
        let quote = estimator
            .estimate_at("110022", MarketPhase::Closed)
            .await
            .expect("estimate");
        assert_eq!(quote.source.as_deref(), Some(SOURCE_OFFICIAL_CLOSE));
        assert_eq!(quote.estimated_value, Some(dec!(3.1420)));
        assert_eq!(quote.estimated_change_percent, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let provider = Arc::new(StubProvider {
            quote: full_quote(),
            calls: AtomicUsize::new(0),
        });
        let estimator = FundEstimator::with_provider(provider.clone());

        let first = estimator
            .estimate_at("110022", MarketPhase::Trading)
            .await
            .expect("estimate");
        let second = estimator
            .estimate_at("110022", MarketPhase::Trading)
            .await
            .expect("estimate");

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        struct FailingProvider;

        #[async_trait]
        impl FundDataProvider for FailingProvider {
            fn id(&self) -> &'static str {
                "FAILING"
            }

            async fn latest_estimate(&self, code: &str) -> Result<FundQuote, MarketDataError> {
                Err(MarketDataError::SymbolNotFound(code.to_string()))
            }
        }

        let estimator = FundEstimator::with_provider(Arc::new(FailingProvider));
        let result = estimator.estimate_at("999999", MarketPhase::Trading).await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }
}

//! Fund data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ConstituentWeight, FundQuote, FundSearchResult, NavPoint};

/// Trait for fund data sources.
///
/// Implement this trait to add support for a new upstream. Only
/// [`latest_estimate`](Self::latest_estimate) is mandatory; search, NAV
/// history and constituent lookups default to `NotSupported` for sources
/// that only deliver estimates.
#[async_trait]
pub trait FundDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// A constant string like "EASTMONEY", used for logging and for the
    /// source tags stamped onto quotes.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering. Lower values = higher priority.
    fn priority(&self) -> u8 {
        10
    }

    /// Fetch the freshest available quote for an instrument code.
    ///
    /// The returned quote may be partial: any subset of its fields may be
    /// absent depending on what the upstream knew. A clean answer with no
    /// usable fields at all is `NoDataAvailable`.
    async fn latest_estimate(&self, code: &str) -> Result<FundQuote, MarketDataError>;

    /// Search for funds matching the query (code, name or pinyin).
    ///
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<FundSearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the most recent `days` points of the settled NAV series,
    /// oldest first.
    ///
    /// Default implementation returns `NotSupported`.
    async fn nav_history(&self, code: &str, days: usize) -> Result<Vec<NavPoint>, MarketDataError> {
        let _ = (code, days);
        Err(MarketDataError::NotSupported {
            operation: "nav_history".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the fund's reported top constituents with weights.
    ///
    /// Default implementation returns `NotSupported`.
    async fn top_holdings(&self, code: &str) -> Result<Vec<ConstituentWeight>, MarketDataError> {
        let _ = code;
        Err(MarketDataError::NotSupported {
            operation: "top_holdings".to_string(),
            provider: self.id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EstimateOnlyProvider;

    #[async_trait]
    impl FundDataProvider for EstimateOnlyProvider {
        fn id(&self) -> &'static str {
            "ESTIMATE_ONLY"
        }

        async fn latest_estimate(&self, _code: &str) -> Result<FundQuote, MarketDataError> {
            Ok(FundQuote::empty())
        }
    }

    #[tokio::test]
    async fn test_default_methods_are_not_supported() {
        let provider = EstimateOnlyProvider;
        assert!(matches!(
            provider.search("alpha").await,
            Err(MarketDataError::NotSupported { .. })
        ));
        assert!(matches!(
            provider.nav_history("110022", 30).await,
            Err(MarketDataError::NotSupported { .. })
        ));
        assert!(matches!(
            provider.top_holdings("110022").await,
            Err(MarketDataError::NotSupported { .. })
        ));
        assert_eq!(provider.priority(), 10);
    }
}

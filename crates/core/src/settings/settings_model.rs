//! Market configuration.

use serde::{Deserialize, Serialize};

use fundlens_market_data::estimator::DEFAULT_OVERVIEW_CODES;

/// Market-level configuration kept alongside the collections: which
/// index secids the overview strip watches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfig {
    #[serde(default)]
    pub watched_indices: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            watched_indices: DEFAULT_OVERVIEW_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_watches_the_two_benchmarks() {
        let config = MarketConfig::default();
        assert_eq!(config.watched_indices.len(), 2);
        assert!(config.watched_indices.contains(&"1.000001".to_string()));
    }
}

//! Exchange snapshot provider.
//!
//! Batch quotes for exchange-listed instruments (ETFs, indices, stocks)
//! via the push2 ulist endpoint. The endpoint addresses instruments by
//! `secid` (`1.` for Shanghai, `0.` for Shenzhen), which is derivable
//! from the leading digits of the bare code.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::ExchangeSnapshot;

const PROVIDER_ID: &str = "EXCHANGE";
const ULIST_URL: &str = "http://push2.eastmoney.com/api/qt/ulist.np/get";
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// The ulist endpoint rejects oversized secid lists.
const BATCH_SIZE: usize = 40;

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Prefix a bare instrument code with its exchange id.
///
/// Codes that already carry a `.` are passed through untouched, so index
/// secids like `1.000001` can be used directly.
pub fn format_secid(code: &str) -> String {
    if code.contains('.') {
        return code.to_string();
    }
    // Shanghai: 6xx stocks, 51/56/58 ETFs, 11 convertibles.
    // Shenzhen: 0xx/30 stocks, 15 ETFs, 12 convertibles.
    let shanghai = ["51", "56", "58", "6", "11"]
        .iter()
        .any(|p| code.starts_with(p));
    if shanghai {
        format!("1.{}", code)
    } else {
        format!("0.{}", code)
    }
}

#[derive(Debug, Deserialize)]
struct UlistResponse {
    data: Option<UlistData>,
}

#[derive(Debug, Deserialize)]
struct UlistData {
    #[serde(default)]
    diff: Vec<UlistItem>,
}

/// One instrument row. With `fltt=2` the numeric fields arrive as plain
/// numbers, except that a suspended instrument reports `"-"`.
#[derive(Debug, Deserialize)]
struct UlistItem {
    /// Last price
    #[serde(default)]
    f2: Option<serde_json::Value>,
    /// Change percent
    #[serde(default)]
    f3: Option<serde_json::Value>,
    /// Bare code
    f12: serde_json::Value,
    /// Display name
    #[serde(default)]
    f14: Option<String>,
}

fn value_to_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        serde_json::Value::String(s) => s.parse::<Decimal>().ok(),
        _ => None,
    }
}

fn value_to_code(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Exchange snapshot provider.
pub struct ExchangeProvider {
    client: Client,
}

impl ExchangeProvider {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            REFERER,
            HeaderValue::from_static("http://fund.eastmoney.com/"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn fetch_batch(&self, secids: &[String]) -> Result<Vec<UlistItem>, MarketDataError> {
        let secid_param = secids.join(",");
        debug!("Exchange snapshot request for {} secids", secids.len());

        let response = self
            .client
            .get(ULIST_URL)
            .query(&[
                ("fltt", "2"),
                ("invt", "2"),
                ("fields", "f2,f3,f12,f14"),
                ("secids", secid_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let parsed: UlistResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::MalformedPayload {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("bad ulist payload: {}", e),
                })?;

        Ok(parsed.data.map(|d| d.diff).unwrap_or_default())
    }

    /// Fetch live change percents for a set of bare codes.
    ///
    /// Suspended instruments (change reported as `"-"`) are left out of
    /// the map rather than faked as zero.
    pub async fn batch_changes(
        &self,
        codes: &[String],
    ) -> Result<HashMap<String, Decimal>, MarketDataError> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let mut unique: Vec<String> = codes.to_vec();
        unique.sort();
        unique.dedup();

        let mut changes = HashMap::new();
        for batch in unique.chunks(BATCH_SIZE) {
            let secids: Vec<String> = batch.iter().map(|c| format_secid(c)).collect();
            for item in self.fetch_batch(&secids).await? {
                if let Some(change) = item.f3.as_ref().and_then(value_to_decimal) {
                    changes.insert(value_to_code(&item.f12), change);
                }
            }
        }
        Ok(changes)
    }

    /// Fetch full snapshots (name, change, last price) for a set of
    /// codes or ready-made secids. Used for the watched-index overview.
    pub async fn snapshots(
        &self,
        codes: &[String],
    ) -> Result<Vec<ExchangeSnapshot>, MarketDataError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let secids: Vec<String> = codes.iter().map(|c| format_secid(c)).collect();
        let items = self.fetch_batch(&secids).await?;

        Ok(items
            .into_iter()
            .map(|item| ExchangeSnapshot {
                code: value_to_code(&item.f12),
                name: item.f14.unwrap_or_default(),
                change_percent: item
                    .f3
                    .as_ref()
                    .and_then(value_to_decimal)
                    .unwrap_or(Decimal::ZERO),
                last_price: item.f2.as_ref().and_then(value_to_decimal),
            })
            .collect())
    }
}

impl Default for ExchangeProvider {
    fn default() -> Self {
        Self::new()
    }
}

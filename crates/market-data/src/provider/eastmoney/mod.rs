//! Eastmoney fund data provider.
//!
//! Three upstream surfaces, all public and unauthenticated:
//! - realtime estimates via the fundgz JSONP endpoint
//! - fund search via the suggest API
//! - settled NAV history and reported constituents via the f10/mobile APIs
//!
//! The estimate endpoint answers inside a `jsonpgz(...)` envelope with
//! every field string-encoded; zero stands for "no data". Normalization
//! of that mess into [`FundQuote`] lives in [`models`].

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{ConstituentWeight, FundQuote, FundSearchResult, NavPoint};
use crate::provider::FundDataProvider;

use models::{
    parse_date, parse_positive_decimal, GzPayload, NavHistoryResponse, PositionResponse,
    SuggestResponse,
};

const PROVIDER_ID: &str = "EASTMONEY";

const ESTIMATE_URL: &str = "http://fundgz.1234567.com.cn/js";
const SUGGEST_URL: &str = "https://fundsuggest.eastmoney.com/FundSearch/api/FundSearchAPI.ashx";
const NAV_HISTORY_URL: &str = "https://api.fund.eastmoney.com/f10/lsjz";
const POSITION_URL: &str = "https://fundmobapi.eastmoney.com/FundMNewApi/FundMNInverstPosition";

const REQUEST_TIMEOUT_SECS: u64 = 5;
const TOP_HOLDINGS_LIMIT: usize = 10;

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

lazy_static! {
    static ref JSONP_ENVELOPE: Regex =
        Regex::new(r"jsonpgz\((.*)\);").expect("valid jsonp regex");
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(
        REFERER,
        HeaderValue::from_static("http://fund.eastmoney.com/"),
    );
    headers
}

/// Eastmoney fund data provider.
pub struct EastmoneyProvider {
    client: Client,
}

impl EastmoneyProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(default_headers())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// GET a URL and return the body, mapping transport failures onto
    /// the crate's error taxonomy.
    async fn fetch_text(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        debug!("Eastmoney request: {} with {} params", url, params.len());

        let response = self
            .client
            .get(url)
            .query(params)
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

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response.text().await.map_err(MarketDataError::Network)
    }

    /// Extract the JSON body from a `jsonpgz(...)` envelope.
    fn unwrap_jsonp(code: &str, body: &str) -> Result<GzPayload, MarketDataError> {
        let captured = JSONP_ENVELOPE
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .ok_or_else(|| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID.to_string(),
                message: "no jsonp envelope".to_string(),
            })?;

        // `jsonpgz();` is how the endpoint spells "unknown fund"
        if captured.is_empty() {
            return Err(MarketDataError::SymbolNotFound(code.to_string()));
        }

        serde_json::from_str(captured).map_err(|e| MarketDataError::MalformedPayload {
            provider: PROVIDER_ID.to_string(),
            message: format!("bad estimate payload: {}", e),
        })
    }
}

impl Default for EastmoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FundDataProvider for EastmoneyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_estimate(&self, code: &str) -> Result<FundQuote, MarketDataError> {
        let url = format!("{}/gszzl_{}.js", ESTIMATE_URL, code);
        let cache_buster = Utc::now().timestamp_millis().to_string();
        let body = self.fetch_text(&url, &[("rt", cache_buster.as_str())]).await?;

        let quote = Self::unwrap_jsonp(code, &body)?.into_quote();
        if quote.is_empty() {
            return Err(MarketDataError::NoDataAvailable);
        }
        Ok(quote)
    }

    async fn search(&self, query: &str) -> Result<Vec<FundSearchResult>, MarketDataError> {
        let body = self
            .fetch_text(SUGGEST_URL, &[("m", "1"), ("key", query)])
            .await?;

        let parsed: SuggestResponse =
            serde_json::from_str(&body).map_err(|e| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID.to_string(),
                message: format!("bad search payload: {}", e),
            })?;

        Ok(parsed
            .datas
            .into_iter()
            .map(|item| FundSearchResult {
                code: item.code,
                name: item.name,
                category: item.base_info.and_then(|info| info.fund_type),
            })
            .collect())
    }

    async fn nav_history(&self, code: &str, days: usize) -> Result<Vec<NavPoint>, MarketDataError> {
        let page_size = days.max(1).to_string();
        let body = self
            .fetch_text(
                NAV_HISTORY_URL,
                &[
                    ("fundCode", code),
                    ("pageIndex", "1"),
                    ("pageSize", page_size.as_str()),
                ],
            )
            .await?;

        let parsed: NavHistoryResponse =
            serde_json::from_str(&body).map_err(|e| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID.to_string(),
                message: format!("bad NAV history payload: {}", e),
            })?;

        let rows = parsed.data.map(|d| d.rows).unwrap_or_default();
        if rows.is_empty() {
            return Err(MarketDataError::NoDataAvailable);
        }

        // The upstream lists newest first; callers expect oldest first.
        let mut points: Vec<NavPoint> = rows
            .into_iter()
            .filter_map(|row| {
                let date = row.date.as_deref().and_then(parse_date)?;
                let value = row.unit_value.as_deref().and_then(parse_positive_decimal)?;
                Some(NavPoint { date, value })
            })
            .collect();
        points.reverse();
        Ok(points)
    }

    async fn top_holdings(&self, code: &str) -> Result<Vec<ConstituentWeight>, MarketDataError> {
        let body = self
            .fetch_text(
                POSITION_URL,
                &[
                    ("FCODE", code),
                    ("deviceid", "Wap"),
                    ("plat", "Wap"),
                    ("product", "EFund"),
                    ("version", "2.0.0"),
                ],
            )
            .await?;

        let parsed: PositionResponse =
            serde_json::from_str(&body).map_err(|e| MarketDataError::MalformedPayload {
                provider: PROVIDER_ID.to_string(),
                message: format!("bad position payload: {}", e),
            })?;

        let stocks = parsed.datas.map(|d| d.stocks).unwrap_or_default();
        Ok(stocks
            .into_iter()
            .filter_map(|stock| {
                let code = stock.code.filter(|c| !c.is_empty())?;
                let weight = stock.weight.as_deref().and_then(parse_positive_decimal)?;
                Some(ConstituentWeight {
                    code,
                    weight_percent: weight,
                })
            })
            .take(TOP_HOLDINGS_LIMIT)
            .collect())
    }
}

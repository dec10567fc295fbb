//! Response structures for the Eastmoney fund endpoints.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::FundQuote;

/// Parse a string-encoded decimal, treating absence and garbage alike.
pub(crate) fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim()).ok()
}

/// Parse a string-encoded decimal that must be strictly positive to be
/// meaningful. The upstreams report "0" for "no data".
pub(crate) fn parse_positive_decimal(value: &str) -> Option<Decimal> {
    parse_decimal(value).filter(|v| *v > Decimal::ZERO)
}

/// Parse an upstream `YYYY-MM-DD` date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Payload inside the `jsonpgz(...)` envelope of the realtime estimate
/// endpoint. Every field is a string and any of them may be missing.
#[derive(Debug, Deserialize)]
pub(crate) struct GzPayload {
    /// Fund display name
    pub name: Option<String>,
    /// Settled NAV date (YYYY-MM-DD)
    pub jzrq: Option<String>,
    /// Settled NAV ("0" when the upstream has none)
    pub dwjz: Option<String>,
    /// Live estimated NAV
    pub gsz: Option<String>,
    /// Live estimated change percent
    pub gszzl: Option<String>,
}

impl GzPayload {
    /// Normalize the stringly payload into an optional-field quote.
    /// Zero and unparseable values collapse to absence for the value
    /// fields; the change percent keeps zero (a flat reading is data).
    pub(crate) fn into_quote(self) -> FundQuote {
        FundQuote {
            reference_value: self.dwjz.as_deref().and_then(parse_positive_decimal),
            reference_date: self.jzrq.as_deref().and_then(parse_date),
            estimated_value: self.gsz.as_deref().and_then(parse_positive_decimal),
            estimated_change_percent: self.gszzl.as_deref().and_then(parse_decimal),
            display_name: self.name.filter(|n| !n.trim().is_empty()),
            source: None,
        }
    }
}

/// Response from the fund suggest (search) endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    #[serde(rename = "Datas", default)]
    pub datas: Vec<SuggestItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestItem {
    #[serde(rename = "CODE")]
    pub code: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "FundBaseInfo", default)]
    pub base_info: Option<SuggestBaseInfo>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct SuggestBaseInfo {
    #[serde(rename = "FTYPE")]
    pub fund_type: Option<String>,
}

/// Response from the NAV history (lsjz) endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct NavHistoryResponse {
    #[serde(rename = "Data")]
    pub data: Option<NavHistoryData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavHistoryData {
    #[serde(rename = "LSJZList", default)]
    pub rows: Vec<NavHistoryRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavHistoryRow {
    /// NAV date (YYYY-MM-DD)
    #[serde(rename = "FSRQ")]
    pub date: Option<String>,
    /// Unit NAV
    #[serde(rename = "DWJZ")]
    pub unit_value: Option<String>,
}

/// Response from the fund position (constituents) endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PositionResponse {
    #[serde(rename = "Datas")]
    pub datas: Option<PositionData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionData {
    #[serde(rename = "fundStocks", default)]
    pub stocks: Vec<PositionStock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionStock {
    /// Stock code
    #[serde(rename = "GPDM")]
    pub code: Option<String>,
    /// Weight in percent of net assets
    #[serde(rename = "JZBL")]
    pub weight: Option<String>,
}

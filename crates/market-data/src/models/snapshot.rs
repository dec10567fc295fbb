use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Live snapshot of one exchange-listed instrument (ETF, index, stock).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSnapshot {
    /// Bare instrument code (no exchange prefix).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Intraday change in percent.
    pub change_percent: Decimal,
    /// Last traded price, when the upstream reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<Decimal>,
}

/// One point of a fund's settled NAV series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// One constituent of a fund's reported top holdings, with its weight in
/// percent of net assets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentWeight {
    pub code: String,
    pub weight_percent: Decimal,
}

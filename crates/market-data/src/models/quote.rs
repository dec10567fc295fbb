use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single merged quote for one fund, as assembled from the upstreams.
///
/// Every field is optional: some sources deliver only a live estimate,
/// others only the settled reference value, and a source may answer with
/// any subset on any given call. Interpreting absence is the job of the
/// consumer's reconciliation step, not of this type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundQuote {
    /// Last officially settled valuation unit (e.g. prior-day NAV).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_value: Option<Decimal>,

    /// Date the reference value settled on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,

    /// Current best-guess live valuation unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<Decimal>,

    /// Estimated intraday change, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_change_percent: Option<Decimal>,

    /// Display name as reported by the upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Which estimation level produced the estimate
    /// (OFFICIAL, OFFICIAL_CLOSE, PROXY_xxxxxx, HOLDINGS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FundQuote {
    /// A quote with every field absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.reference_value.is_none()
            && self.reference_date.is_none()
            && self.estimated_value.is_none()
            && self.estimated_change_percent.is_none()
            && self.display_name.is_none()
            && self.source.is_none()
    }

    /// True when the quote carries a usable live estimate.
    pub fn has_live_estimate(&self) -> bool {
        matches!(self.estimated_value, Some(v) if v > Decimal::ZERO)
    }
}

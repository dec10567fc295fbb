//! Valuation domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::Holding;

/// The authoritative valuation tuple for one holding, as produced by the
/// reconciler. Holds exactly the fields the reconciler is allowed to
/// write back onto a holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation {
    pub reference_value: Decimal,
    pub reference_date: Option<NaiveDate>,
    pub estimated_value: Decimal,
    pub estimated_change_percent: Decimal,
    pub display_name: String,
    pub source_tag: Option<String>,
}

impl Valuation {
    /// Snapshot the current valuation fields of a holding. This is the
    /// total-fallback value the reconciler starts from.
    pub fn of(holding: &Holding) -> Self {
        Self {
            reference_value: holding.reference_value,
            reference_date: holding.reference_date,
            estimated_value: holding.estimated_value,
            estimated_change_percent: holding.estimated_change_percent,
            display_name: holding.display_name.clone(),
            source_tag: holding.source_tag.clone(),
        }
    }

    /// Write the valuation back onto a copy of the holding.
    pub fn apply_to(&self, holding: &Holding) -> Holding {
        let mut next = holding.clone();
        next.reference_value = self.reference_value;
        next.reference_date = self.reference_date;
        next.estimated_value = self.estimated_value;
        next.estimated_change_percent = self.estimated_change_percent;
        next.display_name = self.display_name.clone();
        next.source_tag = self.source_tag.clone();
        next
    }
}

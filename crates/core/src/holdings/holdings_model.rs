//! Holding domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::ledger::Transaction;
use crate::{Error, Result};

/// A tracked position in one instrument within one group, or a
/// watchlist-only entry with zero shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Stable identifier; deterministic so the same instrument can live
    /// in several groups without colliding.
    pub id: String,
    pub instrument_code: String,
    pub display_name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub group_id: String,
    /// Tracked for observation only; excluded from aggregate totals.
    #[serde(default)]
    pub is_watchlist_only: bool,

    // Valuation fields - written only by the reconciler
    pub reference_value: Decimal,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    pub estimated_value: Decimal,
    pub estimated_change_percent: Decimal,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<String>,

    // Ledger fields - written only by the ledger calculator
    pub shares: Decimal,
    pub average_cost: Decimal,
    pub realized_gain: Decimal,
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    pub created_at: DateTime<Utc>,
}

impl Holding {
    /// Build a fresh holding from validated input. Ledger seeding (for a
    /// nonzero starting position) is the service's job.
    pub fn new(input: &NewHolding, created_at: DateTime<Utc>) -> Self {
        Self {
            id: compose_holding_id(&input.instrument_code, &input.group_id, created_at),
            instrument_code: input.instrument_code.clone(),
            display_name: input.display_name.clone(),
            manager: input.manager.clone(),
            tags: input.tags.clone(),
            group_id: input.group_id.clone(),
            is_watchlist_only: input.shares == Decimal::ZERO,
            reference_value: Decimal::ZERO,
            reference_date: None,
            estimated_value: Decimal::ZERO,
            estimated_change_percent: Decimal::ZERO,
            source_tag: None,
            shares: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            realized_gain: Decimal::ZERO,
            transactions: Vec::new(),
            created_at,
        }
    }

    /// Current market value of the position.
    pub fn market_value(&self) -> Decimal {
        self.estimated_value * self.shares
    }

    /// Today's unrealized P/L, derived on demand and never persisted.
    pub fn profit_today(&self) -> Decimal {
        (self.estimated_value - self.reference_value) * self.shares
    }

    /// Cumulative return including realized gains.
    pub fn cumulative_return(&self) -> Decimal {
        self.market_value() - self.average_cost * self.shares + self.realized_gain
    }

    /// Whether the holding participates in aggregate totals.
    pub fn has_position(&self) -> bool {
        !self.is_watchlist_only && self.shares > Decimal::ZERO
    }

    /// Primary tag for allocation purposes.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Deterministic holding id: instrument + group + creation time.
pub fn compose_holding_id(
    instrument_code: &str,
    group_id: &str,
    created_at: DateTime<Utc>,
) -> String {
    format!(
        "{}_{}_{}",
        instrument_code,
        group_id,
        created_at.timestamp_millis()
    )
}

/// Input model for creating a new holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub instrument_code: String,
    pub display_name: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub group_id: String,
    /// Starting position size; zero means watchlist-only.
    #[serde(default)]
    pub shares: Decimal,
    /// Unit cost of the starting position.
    #[serde(default)]
    pub average_cost: Decimal,
}

impl NewHolding {
    /// Validates the new holding data.
    pub fn validate(&self) -> Result<()> {
        if self.instrument_code.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "instrumentCode".to_string(),
            )));
        }
        if self.group_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "groupId".to_string(),
            )));
        }
        if self.shares < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Shares cannot be negative".to_string(),
            )));
        }
        if self.shares > Decimal::ZERO && self.average_cost <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "A starting position needs a positive unit cost".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for editing a holding's descriptive fields. Valuation and
/// ledger fields are not editable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl HoldingUpdate {
    /// Apply the edit, returning the updated holding.
    pub fn apply(&self, holding: &Holding) -> Holding {
        let mut next = holding.clone();
        if let Some(name) = &self.display_name {
            next.display_name = name.clone();
        }
        if let Some(manager) = &self.manager {
            next.manager = Some(manager.clone());
        }
        if let Some(tags) = &self.tags {
            next.tags = tags.clone();
        }
        if let Some(group_id) = &self.group_id {
            next.group_id = group_id.clone();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_holding() -> NewHolding {
        NewHolding {
            instrument_code: "110022".to_string(),
            display_name: "消费行业".to_string(),
            manager: None,
            tags: vec!["消费".to_string()],
            group_id: "g1".to_string(),
            shares: dec!(100),
            average_cost: dec!(1.5),
        }
    }

    #[test]
    fn test_holding_id_is_deterministic() {
        let at = Utc::now();
        assert_eq!(
            compose_holding_id("110022", "g1", at),
            compose_holding_id("110022", "g1", at)
        );
        assert_ne!(
            compose_holding_id("110022", "g1", at),
            compose_holding_id("110022", "g2", at)
        );
    }

    #[test]
    fn test_new_holding_validation() {
        assert!(new_holding().validate().is_ok());

        let mut bad = new_holding();
        bad.instrument_code = "  ".to_string();
        assert!(bad.validate().is_err());

        let mut bad = new_holding();
        bad.shares = dec!(-1);
        assert!(bad.validate().is_err());

        let mut bad = new_holding();
        bad.average_cost = Decimal::ZERO;
        assert!(bad.validate().is_err());

        // watchlist entries need no cost
        let mut watch = new_holding();
        watch.shares = Decimal::ZERO;
        watch.average_cost = Decimal::ZERO;
        assert!(watch.validate().is_ok());
    }

    #[test]
    fn test_watchlist_flag_follows_shares() {
        let mut input = new_holding();
        input.shares = Decimal::ZERO;
        let holding = Holding::new(&input, Utc::now());
        assert!(holding.is_watchlist_only);
        assert!(!holding.has_position());
    }

    #[test]
    fn test_derived_values() {
        let mut holding = Holding::new(&new_holding(), Utc::now());
        holding.shares = dec!(100);
        holding.average_cost = dec!(1.5);
        holding.reference_value = dec!(1.6);
        holding.estimated_value = dec!(1.62);
        holding.realized_gain = dec!(3);

        assert_eq!(holding.market_value(), dec!(162.00));
        assert_eq!(holding.profit_today(), dec!(2.00));
        // 162 - 150 + 3
        assert_eq!(holding.cumulative_return(), dec!(15.00));
    }
}

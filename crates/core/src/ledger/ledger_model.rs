//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::{Error, Result};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Buy,
    Sell,
}

/// One immutable ledger entry. Never edited once appended; corrections
/// are modeled as new offsetting entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Entry timestamp; insertion order is the ledger order, this date
    /// is informational (the trade date may lag the entry date).
    pub date: DateTime<Utc>,
    /// Units traded, strictly positive.
    pub shares: Decimal,
    /// Execution price per unit.
    pub unit_price: Decimal,
    /// Total cash moved by the entry. For buys this is the full outlay
    /// that flows into cost basis, fees included.
    pub gross_amount: Decimal,
    /// Commission/charge recorded with the entry.
    pub fee: Decimal,
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub kind: TransactionKind,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    pub shares: Decimal,
    pub unit_price: Decimal,
    /// Total cash outlay; defaults to `shares * unit_price` when absent.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_amount: Option<Decimal>,
    #[serde(default)]
    pub fee: Decimal,
}

impl NewTransaction {
    /// Validates the transaction input. The ledger itself assumes
    /// validated input; this is the gate.
    pub fn validate(&self) -> Result<()> {
        if self.shares <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transaction shares must be positive".to_string(),
            )));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Unit price cannot be negative".to_string(),
            )));
        }
        if self.fee < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Fee cannot be negative".to_string(),
            )));
        }
        if let Some(gross) = self.gross_amount {
            if gross < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Gross amount cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Consume the validated input into a ledger entry.
    pub fn into_transaction(self) -> Transaction {
        let gross_amount = self
            .gross_amount
            .unwrap_or(self.shares * self.unit_price);
        Transaction {
            id: Uuid::new_v4().to_string(),
            kind: self.kind,
            date: self.date.unwrap_or_else(Utc::now),
            shares: self.shares,
            unit_price: self.unit_price,
            gross_amount,
            fee: self.fee,
        }
    }
}

//! Ledger module - transaction models and the pure cost-basis calculator.

mod ledger_calculator;
mod ledger_model;

#[cfg(test)]
mod ledger_calculator_tests;

pub use ledger_calculator::{apply_transaction, seed_transaction};
pub use ledger_model::{NewTransaction, Transaction, TransactionKind};

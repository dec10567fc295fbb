//! Valuation module - merging fresh quotes into known-good state.

mod valuation_model;
mod valuation_reconciler;


pub use valuation_model::Valuation;
pub use valuation_reconciler::{apply_quote, reconcile};

//! Pure cost-basis arithmetic.
//!
//! The calculator owns the only code allowed to mutate a holding's
//! `shares`, `average_cost` and `realized_gain`. It performs no I/O and
//! assumes validated input (see [`NewTransaction::validate`]); every
//! function returns a new holding rather than editing in place.
//!
//! [`NewTransaction::validate`]: crate::ledger::NewTransaction::validate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::holdings::Holding;

use super::{Transaction, TransactionKind};

/// Apply one ledger entry to a holding.
pub fn apply_transaction(holding: &Holding, transaction: &Transaction) -> Holding {
    match transaction.kind {
        TransactionKind::Buy => apply_buy(holding, transaction),
        TransactionKind::Sell => apply_sell(holding, transaction),
    }
}

/// BUY: shares add up and the average cost re-weights over the full cash
/// outlay. `gross_amount` is fee-inclusive by convention, so the fee
/// lands in the cost basis rather than in realized gain.
fn apply_buy(holding: &Holding, transaction: &Transaction) -> Holding {
    let mut next = holding.clone();

    let new_shares = holding.shares + transaction.shares;
    next.average_cost = if new_shares > Decimal::ZERO {
        (holding.shares * holding.average_cost + transaction.gross_amount) / new_shares
    } else {
        Decimal::ZERO
    };
    next.shares = new_shares;
    next.transactions.push(transaction.clone());
    next
}

/// SELL: clamped to the available inventory, never negative. The average
/// cost is untouched by a partial sale and resets to zero when the
/// position closes. Realized gain books the spread net of the fee.
fn apply_sell(holding: &Holding, transaction: &Transaction) -> Holding {
    let mut next = holding.clone();

    let shares_sold = transaction.shares.min(holding.shares);
    let new_shares = holding.shares - shares_sold;

    let realized_delta =
        (transaction.unit_price - holding.average_cost) * shares_sold - transaction.fee;
    next.realized_gain = holding.realized_gain + realized_delta;

    next.shares = new_shares;
    if new_shares <= Decimal::ZERO {
        next.average_cost = Decimal::ZERO;
    }
    next.transactions.push(transaction.clone());
    next
}

/// Synthesize the implicit first BUY for a holding created with an
/// existing position, so the ledger is self-consistent from creation:
/// no holding ever has `shares > 0` with an empty transaction list.
pub fn seed_transaction(
    shares: Decimal,
    average_cost: Decimal,
    date: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4().to_string(),
        kind: TransactionKind::Buy,
        date,
        shares,
        unit_price: average_cost,
        gross_amount: shares * average_cost,
        fee: Decimal::ZERO,
    }
}

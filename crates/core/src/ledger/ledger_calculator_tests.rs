//! Tests for the cost-basis calculator.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::holdings::{Holding, NewHolding};
use crate::ledger::{apply_transaction, seed_transaction, Transaction, TransactionKind};

fn empty_holding() -> Holding {
    let input = NewHolding {
        instrument_code: "110022".to_string(),
        display_name: "消费行业".to_string(),
        manager: None,
        tags: vec![],
        group_id: "g1".to_string(),
        shares: Decimal::ZERO,
        average_cost: Decimal::ZERO,
    };
    Holding::new(&input, Utc::now())
}

fn buy(shares: Decimal, gross_amount: Decimal) -> Transaction {
    Transaction {
        id: "t-buy".to_string(),
        kind: TransactionKind::Buy,
        date: Utc::now(),
        shares,
        unit_price: if shares > Decimal::ZERO {
            gross_amount / shares
        } else {
            Decimal::ZERO
        },
        gross_amount,
        fee: Decimal::ZERO,
    }
}

fn sell(shares: Decimal, unit_price: Decimal, fee: Decimal) -> Transaction {
    Transaction {
        id: "t-sell".to_string(),
        kind: TransactionKind::Sell,
        date: Utc::now(),
        shares,
        unit_price,
        gross_amount: shares * unit_price,
        fee,
    }
}

#[test]
fn test_first_buy_sets_average_cost() {
    let holding = empty_holding();
    let updated = apply_transaction(&holding, &buy(dec!(100), dec!(1000)));

    assert_eq!(updated.shares, dec!(100));
    assert_eq!(updated.average_cost, dec!(10));
    assert_eq!(updated.transactions.len(), 1);
}

#[test]
fn test_second_buy_reweights_average_cost() {
    let holding = empty_holding();
    let holding = apply_transaction(&holding, &buy(dec!(100), dec!(1000)));
    let holding = apply_transaction(&holding, &buy(dec!(100), dec!(1200)));

    // (100*10 + 1200) / 200
    assert_eq!(holding.average_cost, dec!(11));
    assert_eq!(holding.shares, dec!(200));
    assert_eq!(holding.transactions.len(), 2);
}

#[test]
fn test_partial_sell_books_realized_gain_and_keeps_cost() {
    let holding = empty_holding();
    let holding = apply_transaction(&holding, &buy(dec!(200), dec!(2200)));
    assert_eq!(holding.average_cost, dec!(11));

    let holding = apply_transaction(&holding, &sell(dec!(50), dec!(12), dec!(5)));

    assert_eq!(holding.shares, dec!(150));
    assert_eq!(holding.average_cost, dec!(11));
    // (12 - 11) * 50 - 5
    assert_eq!(holding.realized_gain, dec!(45));
}

#[test]
fn test_sell_to_zero_resets_average_cost() {
    let holding = empty_holding();
    let holding = apply_transaction(&holding, &buy(dec!(100), dec!(1000)));
    let holding = apply_transaction(&holding, &sell(dec!(100), dec!(12), Decimal::ZERO));

    assert_eq!(holding.shares, Decimal::ZERO);
    assert_eq!(holding.average_cost, Decimal::ZERO);
    assert_eq!(holding.realized_gain, dec!(200));
}

#[test]
fn test_oversell_clamps_to_available_shares() {
    let holding = empty_holding();
    let holding = apply_transaction(&holding, &buy(dec!(100), dec!(1000)));
    let holding = apply_transaction(&holding, &sell(dec!(250), dec!(12), Decimal::ZERO));

    // clamped: only 100 shares actually sold, never negative
    assert_eq!(holding.shares, Decimal::ZERO);
    assert_eq!(holding.average_cost, Decimal::ZERO);
    assert_eq!(holding.realized_gain, dec!(200));
}

#[test]
fn test_transactions_are_append_only() {
    let holding = empty_holding();
    let holding = apply_transaction(&holding, &buy(dec!(100), dec!(1000)));
    let before: Vec<String> = holding.transactions.iter().map(|t| t.id.clone()).collect();

    let holding = apply_transaction(&holding, &sell(dec!(10), dec!(12), Decimal::ZERO));
    let after: Vec<String> = holding.transactions.iter().map(|t| t.id.clone()).collect();

    assert_eq!(after.len(), 2);
    assert_eq!(&after[..1], &before[..]);
}

#[test]
fn test_seed_transaction_reproduces_entered_position() {
    let seed = seed_transaction(dec!(300), dec!(1.25), Utc::now());
    let holding = apply_transaction(&empty_holding(), &seed);

    assert_eq!(holding.shares, dec!(300));
    assert_eq!(holding.average_cost, dec!(1.25));
    assert_eq!(holding.transactions.len(), 1);
    assert_eq!(seed.unit_price, dec!(1.25));
    assert_eq!(seed.fee, Decimal::ZERO);
}

// ==================== Properties ====================

/// Tolerance for comparing decimal division round-trips.
fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < dec!(0.000001)
}

proptest! {
    /// The average cost after any sequence of buys equals total cash
    /// paid divided by total shares bought.
    #[test]
    fn prop_average_cost_is_weighted_average(
        lots in prop::collection::vec((1u32..10_000, 1u32..100_000), 1..12)
    ) {
        let mut holding = empty_holding();
        let mut total_shares = Decimal::ZERO;
        let mut total_cash = Decimal::ZERO;

        for (shares, cents) in lots {
            let shares = Decimal::from(shares);
            let gross = Decimal::from(cents) / dec!(100);
            holding = apply_transaction(&holding, &buy(shares, gross));
            total_shares += shares;
            total_cash += gross;
        }

        prop_assert!(close(holding.average_cost, total_cash / total_shares));
        prop_assert_eq!(holding.shares, total_shares);
    }

    /// A covered sell reduces shares exactly and books
    /// (price - average_cost) * shares - fee.
    #[test]
    fn prop_covered_sell_arithmetic(
        held in 100u32..100_000,
        sold in 1u32..100,
        price_cents in 1u32..10_000,
        fee_cents in 0u32..500,
    ) {
        let held = Decimal::from(held);
        let sold = Decimal::from(sold);
        let price = Decimal::from(price_cents) / dec!(100);
        let fee = Decimal::from(fee_cents) / dec!(100);

        let holding = apply_transaction(&empty_holding(), &buy(held, held * dec!(10)));
        let updated = apply_transaction(&holding, &sell(sold, price, fee));

        prop_assert_eq!(updated.shares, held - sold);
        prop_assert_eq!(
            updated.realized_gain,
            (price - holding.average_cost) * sold - fee
        );
    }

    /// Shares never go negative, whatever is thrown at the ledger.
    #[test]
    fn prop_shares_never_negative(
        held in 0u32..1_000,
        sold in 0u32..10_000,
    ) {
        let held = Decimal::from(held);
        let sold = Decimal::from(sold) + dec!(1);

        let mut holding = empty_holding();
        if held > Decimal::ZERO {
            holding = apply_transaction(&holding, &buy(held, held * dec!(2)));
        }
        let updated = apply_transaction(&holding, &sell(sold, dec!(3), Decimal::ZERO));

        prop_assert!(updated.shares >= Decimal::ZERO);
        if updated.shares == Decimal::ZERO {
            prop_assert_eq!(updated.average_cost, Decimal::ZERO);
        }
    }
}

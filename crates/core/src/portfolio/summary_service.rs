//! Pure aggregation over the current collections.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::constants::UNTAGGED_BUCKET;
use crate::groups::Group;
use crate::holdings::Holding;

use super::{GroupStats, PortfolioTotals, TagAllocation};

/// Holdings that participate in totals: non-watchlist with shares held.
fn counted(holdings: &[Holding]) -> impl Iterator<Item = &Holding> {
    holdings.iter().filter(|h| h.has_position())
}

/// Per-group roll-ups, sorted by market value descending. Ties keep the
/// groups' input order (stable sort).
pub fn group_stats(groups: &[Group], holdings: &[Holding]) -> Vec<GroupStats> {
    let mut stats: Vec<GroupStats> = groups
        .iter()
        .map(|group| {
            let mut market_value = Decimal::ZERO;
            let mut today_profit = Decimal::ZERO;
            let mut cumulative_return = Decimal::ZERO;
            let mut count = 0usize;

            for holding in counted(holdings).filter(|h| h.group_id == group.id) {
                market_value += holding.market_value();
                today_profit += holding.profit_today();
                cumulative_return += holding.cumulative_return();
                count += 1;
            }

            GroupStats {
                group_id: group.id.clone(),
                name: group.name.clone(),
                is_default: group.is_default,
                market_value,
                today_profit,
                cumulative_return,
                count,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.market_value.cmp(&a.market_value));
    stats
}

/// Totals over every counted holding, independent of grouping.
pub fn portfolio_totals(holdings: &[Holding]) -> PortfolioTotals {
    let mut totals = PortfolioTotals::default();
    for holding in counted(holdings) {
        totals.market_value += holding.market_value();
        totals.today_profit += holding.profit_today();
        totals.cumulative_return += holding.cumulative_return();
        totals.count += 1;
    }
    totals
}

/// Market value by primary tag (first tag in the holding's list, or the
/// untagged bucket), sorted descending by value with stable ties.
pub fn allocation_by_tag(holdings: &[Holding]) -> Vec<TagAllocation> {
    // first-seen order keeps the output deterministic through the sort
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Decimal> = HashMap::new();

    for holding in counted(holdings) {
        let tag = holding.primary_tag().unwrap_or(UNTAGGED_BUCKET).to_string();
        if !values.contains_key(&tag) {
            order.push(tag.clone());
        }
        *values.entry(tag).or_insert(Decimal::ZERO) += holding.market_value();
    }

    let mut allocations: Vec<TagAllocation> = order
        .into_iter()
        .map(|tag| {
            let market_value = values.get(&tag).copied().unwrap_or(Decimal::ZERO);
            TagAllocation { tag, market_value }
        })
        .collect();
    allocations.sort_by(|a, b| b.market_value.cmp(&a.market_value));
    allocations
}

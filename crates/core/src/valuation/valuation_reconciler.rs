//! The valuation reconciler.
//!
//! Upstream sources intermittently report zero or garbage instead of
//! failing cleanly. The reconciler is the single place that interprets
//! absence: it merges a possibly-null, possibly-partial quote into a
//! holding's last known-good valuation under a fixed fallback
//! precedence, and guarantees that no single bad field can null out
//! previously-good display data.

use rust_decimal::Decimal;

use fundlens_market_data::FundQuote;

use crate::constants::FALLBACK_UNIT_VALUE;
use crate::holdings::Holding;

use super::Valuation;

/// A value field is usable only when present and strictly positive;
/// the upstreams use zero as their null.
fn valid(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Merge a fresh quote into the holding's prior valuation.
///
/// Precedence, in order:
/// 1. No quote at all: the prior valuation stands unchanged.
/// 2. Reference value: the quote's if valid; else, when the prior has
///    never been established, the quote's estimate or the sentinel.
/// 3. Estimated value: the quote's if valid; else the (possibly just
///    updated) reference value; else the prior estimate; else sentinel.
/// 4. Change percent: the quote's only when its live estimate was the
///    accepted source in step 3, else zero.
/// 5. Display name: the quote's when non-empty.
/// 6. Reference date rides with an accepted reference value, the source
///    tag with an accepted live estimate.
pub fn reconcile(prior: &Holding, quote: Option<&FundQuote>) -> Valuation {
    let mut valuation = Valuation::of(prior);

    let Some(quote) = quote else {
        return valuation;
    };

    // Step 2: reference value
    let mut reference_accepted = false;
    if let Some(reference) = valid(quote.reference_value) {
        valuation.reference_value = reference;
        reference_accepted = true;
    } else if prior.reference_value <= Decimal::ZERO {
        valuation.reference_value =
            valid(quote.estimated_value).unwrap_or(FALLBACK_UNIT_VALUE);
    }

    // Step 3: estimated value
    let mut live_estimate_accepted = false;
    if let Some(estimate) = valid(quote.estimated_value) {
        valuation.estimated_value = estimate;
        live_estimate_accepted = true;
    } else if valuation.reference_value > Decimal::ZERO {
        valuation.estimated_value = valuation.reference_value;
    } else if prior.estimated_value > Decimal::ZERO {
        valuation.estimated_value = prior.estimated_value;
    } else {
        valuation.estimated_value = FALLBACK_UNIT_VALUE;
    }

    // Step 4: change percent
    valuation.estimated_change_percent = if live_estimate_accepted {
        quote.estimated_change_percent.unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    // Step 5: display name
    if let Some(name) = quote.display_name.as_deref() {
        if !name.trim().is_empty() {
            valuation.display_name = name.to_string();
        }
    }

    // Step 6: provenance rides with the value it describes
    if reference_accepted {
        if let Some(date) = quote.reference_date {
            valuation.reference_date = Some(date);
        }
    }
    if live_estimate_accepted {
        if let Some(source) = &quote.source {
            valuation.source_tag = Some(source.clone());
        }
    }

    valuation
}

/// Reconcile and write back, returning the updated holding.
pub fn apply_quote(prior: &Holding, quote: Option<&FundQuote>) -> Holding {
    reconcile(prior, quote).apply_to(prior)
}

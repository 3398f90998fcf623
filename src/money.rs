//! Currency amounts.
//!
//! Amounts are exact decimals restricted to whole cents, so every split and
//! every balance stays exact and the ledger always sums to zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const CENT: Decimal = dec!(0.01);

/// Balances no further from zero than this are settled.
pub const SETTLED_EPSILON: Decimal = CENT;

pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Check that `amount` is a positive whole number of cents within range.
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err(format!("amount must be positive, got {amount}"));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("amount must not exceed {MAX_AMOUNT}"));
    }
    if amount.normalize().scale() > 2 {
        return Err(format!("amount {amount} has fractions of a cent"));
    }
    Ok(())
}

/// Split `amount` into `parts` shares of whole cents that sum to `amount`.
///
/// Every share gets the floor of the even split; the cents left over go one
/// each to the last shares, so 100 over three parts is 33.33, 33.33, 33.34.
/// Amounts are expected in whole cents (see [`validate_amount`]); any
/// fraction of a cent stays on the last share so the sum is still exact.
pub fn split_evenly(amount: Decimal, parts: usize) -> Vec<Decimal> {
    if parts == 0 {
        return Vec::new();
    }
    let count = Decimal::from(parts);
    let cents = amount / CENT;
    let base = (cents / count).floor();
    let leftover = (cents - base * count).floor();
    let fraction = cents - base * count - leftover;
    (0..parts)
        .map(|i| {
            let mut share = base;
            if Decimal::from(parts - i) <= leftover {
                share += Decimal::ONE;
            }
            if i + 1 == parts {
                share += fraction;
            }
            share * CENT
        })
        .collect()
}

/// Round to cents for display, e.g. `₹33.34`. Negative amounts keep their
/// sign in front of the symbol.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{symbol}{:.2}", rounded.abs())
    } else {
        format!("{symbol}{:.2}", rounded.abs())
    }
}

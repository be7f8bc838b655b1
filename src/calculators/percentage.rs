//! Percentage Discount
//!
//! A flat percentage off the whole cart subtotal. Imposes no cart-shape
//! requirement: once eligibility passed, it always applies.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::evaluation::Breakdown;

use super::{CalculatorResult, Computed};

/// Compute `subtotal * percent / 100`, unrounded.
///
/// # Errors
///
/// Never rejects; the signature matches the other calculators so dispatch
/// stays uniform.
pub fn percentage_discount<'a>(
    subtotal: &Money<'a, Currency>,
    percent: Decimal,
) -> CalculatorResult<'a> {
    let subtotal_minor = Decimal::from(subtotal.to_minor_units());
    let amount_minor = subtotal_minor.saturating_mul(percent) / Decimal::ONE_HUNDRED;

    Ok(Computed {
        amount_minor,
        breakdown: Breakdown::Percentage { percent },
    })
}

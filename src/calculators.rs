//! Discount Calculators
//!
//! One calculator per discount kind. Each consumes the cart snapshot and the
//! code's parameters and produces an unrounded discount amount in minor
//! units plus a structured breakdown, or a [`Rejection`] describing exactly
//! what the cart is missing. Rounding and clamping belong to the result
//! assembler so every kind shares one policy.

use rust_decimal::Decimal;

use crate::evaluation::{Breakdown, Rejection};

mod buy_x_get_x_free;
mod buy_x_get_y_percent_off;
mod fixed_amount;
mod percentage;

pub use buy_x_get_x_free::*;
pub use buy_x_get_y_percent_off::*;
pub use fixed_amount::*;
pub use percentage::*;

/// A calculator's raw output.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed<'a> {
    /// The unrounded discount amount in minor units.
    pub amount_minor: Decimal,

    /// Which lines the discount touches and how.
    pub breakdown: Breakdown<'a>,
}

/// Either a raw computation or the rejection explaining why none was possible.
pub type CalculatorResult<'a> = Result<Computed<'a>, Rejection<'a>>;

/// Multiply a minor-unit price by a unit count.
///
/// Saturates at `Decimal::MAX`; the assembler clamps the final amount to the
/// cart subtotal, so saturation can never inflate a result.
pub(crate) fn units_times_price(quantity: u32, unit_price_minor: i64) -> Decimal {
    Decimal::from(unit_price_minor).saturating_mul(Decimal::from(quantity))
}

//! Evaluation
//!
//! The engine's public result shape and entry point. [`evaluate`] runs the
//! eligibility checker, dispatches to the matching calculator, and assembles
//! the final result: one rounding policy (half-up to whole minor units), one
//! clamp (never more than the subtotal), and one home for rejection wording.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    calculators::{
        Computed, buy_x_get_x_free, buy_x_get_y_percent_off, fixed_amount_discount,
        percentage_discount,
    },
    carts::{Cart, CartError},
    codes::{DiscountCode, DiscountKind},
    eligibility::check_eligibility,
};

/// Why a discount code did not apply.
///
/// Rejections are values, not faults; the engine never panics on bad input.
/// Every quantitative rejection carries its exact shortfall, and the wording
/// here is the single source of truth for every surface that renders one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection<'a> {
    /// The code is unknown or has been deactivated.
    #[error("this discount code is not valid")]
    InvalidCode,

    /// The code's expiry moment has passed.
    #[error("this discount code has expired")]
    Expired,

    /// The code has been redeemed as many times as it allows.
    #[error("this discount code has reached its usage limit")]
    UsageLimitReached,

    /// The cart subtotal is below the code's minimum order amount.
    #[error("add {shortfall} more to your order to use this code")]
    BelowMinimum {
        /// Exactly how much more the subtotal needs.
        shortfall: Money<'a, Currency>,
    },

    /// The cart holds no units a quantity-based code could count.
    #[error("your cart is empty")]
    EmptyCart,

    /// The cart holds fewer units than the code's buy requirement.
    #[error("add {needed} more item(s) to use this code")]
    InsufficientQuantity {
        /// How many more units are needed to meet the buy requirement.
        needed: u64,
    },

    /// The buy requirement is met but no full set is complete yet.
    #[error("add {needed} more item(s) to complete the offer")]
    NeedsMoreForNextSet {
        /// How many more units complete the next set.
        needed: u64,
    },

    /// The stored record is malformed or names a kind this engine lacks.
    #[error("this discount code is not supported")]
    UnsupportedKind,
}

/// A cart fragment that became free under a buy-X-get-X-free code.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeItem<'a> {
    /// Product identifier of the source line.
    pub product_id: String,

    /// Display name of the source line.
    pub name: String,

    /// How many units of the line are free.
    pub quantity: u32,

    /// The line's unit price.
    pub unit_price: Money<'a, Currency>,
}

/// A cart fragment discounted under a buy-X-get-Y%-off code.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountedItem<'a> {
    /// Product identifier of the source line.
    pub product_id: String,

    /// Display name of the source line.
    pub name: String,

    /// How many units of the line are discounted.
    pub quantity: u32,

    /// The line's unit price.
    pub unit_price: Money<'a, Currency>,

    /// The discount on this fragment, rounded for display.
    pub discount_amount: Money<'a, Currency>,
}

/// Variant-specific detail of an applied discount.
#[derive(Debug, Clone, PartialEq)]
pub enum Breakdown<'a> {
    /// A percentage was taken off the whole subtotal.
    Percentage {
        /// The percent applied.
        percent: Decimal,
    },

    /// A fixed amount was taken off the subtotal.
    FixedAmount,

    /// These fragments became free.
    FreeItems(SmallVec<[FreeItem<'a>; 4]>),

    /// These fragments were discounted.
    DiscountedItems(SmallVec<[DiscountedItem<'a>; 4]>),
}

/// A successfully applied discount.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDiscount<'a> {
    /// The discount amount, rounded half-up and clamped to the subtotal.
    pub amount: Money<'a, Currency>,

    /// Which lines the discount touches and how.
    pub breakdown: Breakdown<'a>,
}

/// The outcome of evaluating one code against one cart.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation<'a> {
    /// The code applies; fold the amount into the order total.
    Applied(AppliedDiscount<'a>),

    /// The code does not apply, for the given reason.
    Rejected(Rejection<'a>),
}

impl<'a> Evaluation<'a> {
    /// Whether the code applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Evaluation::Applied(_))
    }

    /// The applied discount, if any.
    pub fn applied(&self) -> Option<&AppliedDiscount<'a>> {
        match self {
            Evaluation::Applied(applied) => Some(applied),
            Evaluation::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<&Rejection<'a>> {
        match self {
            Evaluation::Applied(_) => None,
            Evaluation::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Engine faults that are not policy rejections.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Wrapped cart construction or subtotal error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Evaluate a discount code against a cart snapshot at a given moment.
///
/// Pure and deterministic: no I/O, no hidden state, and the code's usage
/// counter is never touched, so re-evaluating on every cart change is safe.
///
/// # Errors
///
/// Returns an [`EvaluationError`] only for internal faults (an
/// unrepresentable subtotal); every policy outcome, including malformed
/// records, is an [`Evaluation::Rejected`] value.
pub fn evaluate<'a>(
    code: &DiscountCode,
    cart: &'a Cart<'a>,
    now: DateTime<Utc>,
) -> Result<Evaluation<'a>, EvaluationError> {
    let subtotal = cart.subtotal()?;

    if let Err(rejection) = check_eligibility(code, &subtotal, now) {
        return Ok(Evaluation::Rejected(rejection));
    }

    let Ok(kind) = code.kind(cart.currency()) else {
        return Ok(Evaluation::Rejected(Rejection::UnsupportedKind));
    };

    let computed = match kind {
        DiscountKind::Percentage { percent } => percentage_discount(&subtotal, percent),
        DiscountKind::FixedAmount { amount } => fixed_amount_discount(&subtotal, &amount),
        DiscountKind::BuyXGetXFree {
            buy_count,
            free_count,
        } => buy_x_get_x_free(cart, buy_count, free_count),
        DiscountKind::BuyXGetYPercentOff {
            buy_count,
            discount_percent,
        } => buy_x_get_y_percent_off(cart, buy_count, discount_percent),
    };

    match computed {
        Ok(computed) => Ok(Evaluation::Applied(assemble(computed, &subtotal))),
        Err(rejection) => Ok(Evaluation::Rejected(rejection)),
    }
}

/// Round a raw minor-unit amount half-up to whole minor units.
pub(crate) fn round_minor(amount: Decimal) -> i64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Round the calculator's raw amount, clamp it to the subtotal, and wrap the
/// breakdown into the public result shape.
fn assemble<'a>(computed: Computed<'a>, subtotal: &Money<'a, Currency>) -> AppliedDiscount<'a> {
    let rounded = round_minor(computed.amount_minor);
    let clamped = rounded.clamp(0, subtotal.to_minor_units());

    AppliedDiscount {
        amount: Money::from_minor(clamped, subtotal.currency()),
        breakdown: computed.breakdown,
    }
}

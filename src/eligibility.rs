//! Eligibility
//!
//! Validates a discount-code record against its own static and temporal
//! constraints before any monetary calculation runs. Cart composition
//! failures (empty cart, not enough units) belong to the calculators.

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};

use crate::{codes::DiscountCode, evaluation::Rejection};

/// Check a code against its own constraints and the cart subtotal.
///
/// Checks run in order and short-circuit on the first failure:
///
/// 1. the code must be active,
/// 2. the code must not have expired,
/// 3. the usage cap must not have been reached,
/// 4. the subtotal must meet the minimum order amount.
///
/// The minimum-order rejection carries the exact shortfall so callers can
/// render "add X more to qualify" precisely.
///
/// # Errors
///
/// Returns the first failing [`Rejection`]; purely a predicate pipeline, no
/// side effects.
pub fn check_eligibility<'a>(
    code: &DiscountCode,
    subtotal: &Money<'a, Currency>,
    now: DateTime<Utc>,
) -> Result<(), Rejection<'a>> {
    if !code.is_active {
        return Err(Rejection::InvalidCode);
    }

    if let Some(expires_at) = code.expires_at {
        if now > expires_at {
            return Err(Rejection::Expired);
        }
    }

    if let Some(max_uses) = code.max_uses {
        if code.current_uses >= max_uses {
            return Err(Rejection::UsageLimitReached);
        }
    }

    if let Some(min_minor) = code.min_order_amount {
        let subtotal_minor = subtotal.to_minor_units();
        if subtotal_minor < min_minor {
            return Err(Rejection::BelowMinimum {
                shortfall: Money::from_minor(min_minor - subtotal_minor, subtotal.currency()),
            });
        }
    }

    Ok(())
}

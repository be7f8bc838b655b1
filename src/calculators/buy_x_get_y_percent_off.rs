//! Buy-X-Get-Y%-Off
//!
//! Holding `buy_count` units unlocks a percentage off one additional unit;
//! every full `buy_count + 1` grouping unlocks one more. Discounted units are
//! assigned cheapest first.

use rust_decimal::Decimal;
use rusty_money::Money;
use smallvec::SmallVec;

use crate::{
    allocation::AllocationPool,
    carts::Cart,
    evaluation::{Breakdown, DiscountedItem, Rejection, round_minor},
};

use super::{CalculatorResult, Computed, units_times_price};

/// Compute the discounted units for a buy-X-get-Y%-off code.
///
/// # Errors
///
/// Rejects with [`Rejection::EmptyCart`] when the cart holds no units and
/// [`Rejection::InsufficientQuantity`] when fewer than `buy_count + 1` units
/// are present, carrying the exact shortfall.
pub fn buy_x_get_y_percent_off<'a>(
    cart: &'a Cart<'a>,
    buy_count: u32,
    discount_percent: Decimal,
) -> CalculatorResult<'a> {
    let total_qty = cart.total_quantity();
    if total_qty == 0 {
        return Err(Rejection::EmptyCart);
    }

    // One extra unit beyond the buy requirement carries the discount.
    let required = u64::from(buy_count) + 1;
    if total_qty < required {
        return Err(Rejection::InsufficientQuantity {
            needed: required - total_qty,
        });
    }

    let discount_sets = total_qty / required;
    let picks = AllocationPool::new(cart).allocate(discount_sets);

    let mut amount_minor = Decimal::ZERO;
    let mut discounted_items = SmallVec::new();

    for pick in picks {
        let unit_minor = pick.line.unit_price().to_minor_units();
        let fragment_minor = units_times_price(pick.quantity, unit_minor)
            .saturating_mul(discount_percent)
            / Decimal::ONE_HUNDRED;

        amount_minor = amount_minor.saturating_add(fragment_minor);

        discounted_items.push(DiscountedItem {
            product_id: pick.line.product_id().to_string(),
            name: pick.line.name().to_string(),
            quantity: pick.quantity,
            unit_price: *pick.line.unit_price(),
            discount_amount: Money::from_minor(
                round_minor(fragment_minor),
                pick.line.unit_price().currency(),
            ),
        });
    }

    Ok(Computed {
        amount_minor,
        breakdown: Breakdown::DiscountedItems(discounted_items),
    })
}

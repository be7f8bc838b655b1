//! Buy-X-Get-X-Free
//!
//! Every full set of `buy_count + free_count` units makes `free_count` units
//! free, assigned to the cheapest units first.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    allocation::AllocationPool,
    carts::Cart,
    evaluation::{Breakdown, FreeItem, Rejection},
};

use super::{CalculatorResult, Computed, units_times_price};

/// Compute the free units for a buy-X-get-X-free code.
///
/// # Errors
///
/// Rejects with [`Rejection::EmptyCart`] when the cart holds no units,
/// [`Rejection::InsufficientQuantity`] when the buy requirement is unmet, and
/// [`Rejection::NeedsMoreForNextSet`] when the buy requirement is met but no
/// full set is complete; each carries its exact shortfall.
pub fn buy_x_get_x_free<'a>(
    cart: &'a Cart<'a>,
    buy_count: u32,
    free_count: u32,
) -> CalculatorResult<'a> {
    // Zero counts are caught during kind validation; guard anyway so a direct
    // call can never divide by a zero set size.
    if buy_count == 0 || free_count == 0 {
        return Err(Rejection::UnsupportedKind);
    }

    let total_qty = cart.total_quantity();
    if total_qty == 0 {
        return Err(Rejection::EmptyCart);
    }

    let buy = u64::from(buy_count);
    if total_qty < buy {
        return Err(Rejection::InsufficientQuantity {
            needed: buy - total_qty,
        });
    }

    let set_size = buy + u64::from(free_count);
    let full_sets = total_qty / set_size;
    if full_sets == 0 {
        return Err(Rejection::NeedsMoreForNextSet {
            needed: set_size - total_qty % set_size,
        });
    }

    let total_free = full_sets * u64::from(free_count);
    let picks = AllocationPool::new(cart).allocate(total_free);

    let mut amount_minor = Decimal::ZERO;
    let mut free_items = SmallVec::new();

    for pick in picks {
        let unit_minor = pick.line.unit_price().to_minor_units();
        amount_minor = amount_minor.saturating_add(units_times_price(pick.quantity, unit_minor));

        free_items.push(FreeItem {
            product_id: pick.line.product_id().to_string(),
            name: pick.line.name().to_string(),
            quantity: pick.quantity,
            unit_price: *pick.line.unit_price(),
        });
    }

    Ok(Computed {
        amount_minor,
        breakdown: Breakdown::FreeItems(free_items),
    })
}

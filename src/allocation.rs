//! Allocation
//!
//! The cheapest-first allocator shared by the quantity-based calculators.
//! It decides *which* cart units receive a free or discounted benefit: units
//! are handed out from the cheapest eligible line upward, so multiple
//! products at different prices always yield one deterministic answer.

use smallvec::SmallVec;

use crate::carts::{Cart, CartLine};

/// One allocator pick: `quantity` units consumed from a single cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocated<'a> {
    /// The cart line the units came from.
    pub line: &'a CartLine<'a>,

    /// How many of the line's units were consumed.
    pub quantity: u32,
}

/// A price-sorted allocation view over a cart's eligible lines.
///
/// Zero-price lines cannot be made any cheaper and are excluded from the
/// pool; their units still count toward [`Cart::total_quantity`], which the
/// quantity-based calculators use for set arithmetic. The view is pure: the
/// cart itself is never re-ordered or mutated.
#[derive(Debug)]
pub struct AllocationPool<'a> {
    lines: Vec<&'a CartLine<'a>>,
}

impl<'a> AllocationPool<'a> {
    /// Build the pool for a cart.
    ///
    /// Lines are filtered to positive unit prices and stable-sorted ascending
    /// by unit price, so equal-priced lines keep the cart's input order.
    pub fn new(cart: &'a Cart<'a>) -> Self {
        let mut lines: Vec<&CartLine<'_>> = cart
            .lines()
            .iter()
            .filter(|line| line.unit_price().to_minor_units() > 0)
            .collect();

        lines.sort_by_key(|line| line.unit_price().to_minor_units());

        AllocationPool { lines }
    }

    /// Total units available for allocation.
    pub fn available(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Allocate up to `units` units, cheapest lines first.
    ///
    /// Walks the sorted lines consuming `min(remaining, line.quantity)` from
    /// each until the request is filled or the pool is exhausted. Returns one
    /// pick per touched line, in allocation order.
    pub fn allocate(&self, units: u64) -> SmallVec<[Allocated<'a>; 4]> {
        let mut picks = SmallVec::new();
        let mut remaining = units;

        for line in &self.lines {
            if remaining == 0 {
                break;
            }

            let take = remaining.min(u64::from(line.quantity()));
            // take fits in u32: it is bounded by the line quantity.
            let quantity = u32::try_from(take).unwrap_or(line.quantity());

            picks.push(Allocated { line, quantity });
            remaining -= take;
        }

        picks
    }
}

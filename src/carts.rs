//! Carts
//!
//! Immutable cart snapshots as seen by the discount engine: ordered lines,
//! one currency, and the pre-discount subtotal.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to cart snapshot construction or totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line was given a quantity of zero.
    #[error("Line {0} has a quantity of zero")]
    ZeroQuantity(usize),

    /// A line was given a negative unit price.
    #[error("Line {0} has a negative unit price")]
    NegativeUnitPrice(usize),

    /// The subtotal exceeded the representable money range.
    #[error("Cart subtotal is not representable in minor units")]
    SubtotalOverflow,
}

/// One cart line: a product at a unit price, in some quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product_id: String,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a new cart line.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// The product identifier for this line.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// The display name for this line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit price for this line.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// The quantity of units on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The line total in minor units, if representable.
    fn total_minor(&self) -> Option<i64> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
    }
}

/// Cart snapshot
///
/// Line order is preserved but irrelevant to evaluation results; the
/// allocator re-sorts internally.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line's currency differs from the cart
    /// currency, a quantity is zero, or a unit price is negative.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.unit_price.currency();
            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(i));
            }
            if line.unit_price.to_minor_units() < 0 {
                return Err(CartError::NegativeUnitPrice(i));
            }
            Ok(())
        })?;

        Ok(Cart { lines, currency })
    }

    /// Calculate the pre-discount subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SubtotalOverflow`] if the total exceeds the
    /// representable minor-unit range.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        let total = self.lines.iter().try_fold(0i64, |acc, line| {
            line.total_minor()
                .and_then(|line_total| acc.checked_add(line_total))
                .ok_or(CartError::SubtotalOverflow)
        })?;

        Ok(Money::from_minor(total, self.currency))
    }

    /// Total number of units across all lines, zero-price lines included.
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// The lines of the cart, in input order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

//! Fixtures
//!
//! Named YAML fixture sets holding a cart and the discount codes on offer,
//! used by the demo binary and the integration tests.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    carts::{Cart, CartError, CartLine},
    codes::DiscountCode,
    repository::InMemoryCodes,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Cart construction error
    #[error("Failed to build cart: {0}")]
    Cart(#[from] CartError),
}

/// A cart line as written in a fixture file.
#[derive(Debug, Deserialize)]
pub struct LineFixture {
    /// Product identifier
    pub product_id: String,

    /// Display name
    pub name: String,

    /// Unit price in minor units (pence/cents)
    pub unit_price: i64,

    /// Number of units
    pub quantity: u32,
}

/// One named fixture set: currency, cart lines, and discount codes.
#[derive(Debug, Deserialize)]
pub struct FixtureSet {
    /// ISO alpha code for every price in the set
    pub currency: String,

    /// The cart lines
    pub lines: Vec<LineFixture>,

    /// The discount codes on offer
    pub codes: Vec<DiscountCode>,
}

impl FixtureSet {
    /// Load `fixtures/<name>.yml` relative to the crate root.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(PathBuf::from("./fixtures").join(format!("{name}.yml")))
    }

    /// Load a fixture set from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.into())?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Resolve the fixture's currency.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnknownCurrency`] if the ISO code is unknown.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        iso::find(&self.currency).ok_or_else(|| FixtureError::UnknownCurrency(self.currency.clone()))
    }

    /// Build the fixture's cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the currency is unknown or a line is
    /// invalid.
    pub fn cart(&self) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency()?;

        let lines: Vec<CartLine<'static>> = self
            .lines
            .iter()
            .map(|line| {
                CartLine::new(
                    line.product_id.clone(),
                    line.name.clone(),
                    Money::from_minor(line.unit_price, currency),
                    line.quantity,
                )
            })
            .collect();

        Ok(Cart::with_lines(lines, currency)?)
    }

    /// Build an in-memory code store from the fixture's records.
    pub fn code_store(&self) -> InMemoryCodes {
        let mut store = InMemoryCodes::new();

        for code in &self.codes {
            store.insert(code.clone());
        }

        store
    }
}

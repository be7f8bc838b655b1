//! Discount Codes
//!
//! The stored discount-code record as an admin surface or document store
//! hands it to us, plus the validated [`DiscountKind`] sum type the engine
//! dispatches on. Records are untrusted: a record whose kind fields do not
//! line up is surfaced as a [`KindError`], never a panic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Discount Code Key
    pub struct CodeKey;
}

/// Wire tag for the discount kind of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    /// Percentage off the cart subtotal
    Percentage,
    /// Fixed amount off the cart subtotal
    FixedAmount,
    /// Buy X units, get Y units free
    BuyXGetXFree,
    /// Buy X units, get one more at a percentage off
    BuyXGetYPercentOff,
    /// Any tag this engine does not recognise
    #[serde(other)]
    Unknown,
}

/// Errors deriving a validated [`DiscountKind`] from a stored record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KindError {
    /// The record carries a kind tag this engine does not recognise.
    #[error("unrecognised discount kind")]
    UnknownKind,

    /// A field the record's kind requires is missing.
    #[error("missing field for discount kind: {0}")]
    MissingField(&'static str),

    /// A field the record's kind requires holds an unusable value.
    #[error("invalid value for field: {0}")]
    InvalidField(&'static str),
}

/// A stored discount-code record.
///
/// Fields are optional wherever the admin surface may omit them; exactly one
/// kind's fields should be populated. The engine only ever reads
/// `current_uses`; incrementing it belongs to the order-creation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCode {
    /// The claimed code, compared case-insensitively.
    pub code: String,

    /// Which discount rule this record describes.
    pub kind: KindTag,

    /// Percentage off the subtotal (`Percentage` only).
    #[serde(default)]
    pub percent_value: Option<Decimal>,

    /// Fixed amount off in minor units (`FixedAmount` only).
    #[serde(default)]
    pub fixed_value: Option<i64>,

    /// Units that must be bought (`BuyXGetXFree` and `BuyXGetYPercentOff`).
    #[serde(default)]
    pub buy_count: Option<u32>,

    /// Units given free per full set (`BuyXGetXFree` only).
    #[serde(default)]
    pub free_count: Option<u32>,

    /// Percentage off the unlocked unit (`BuyXGetYPercentOff` only).
    #[serde(default)]
    pub discount_percent: Option<Decimal>,

    /// Subtotal floor in minor units required before the code applies.
    #[serde(default)]
    pub min_order_amount: Option<i64>,

    /// Usage cap; `None` means unlimited.
    #[serde(default)]
    pub max_uses: Option<u32>,

    /// Times the code has been redeemed so far.
    #[serde(default)]
    pub current_uses: u32,

    /// Whether the code is live.
    pub is_active: bool,

    /// Moment after which the code no longer applies.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The validated, closed set of discount kinds.
///
/// Adding a kind here forces every dispatch site to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountKind<'a> {
    /// Percentage off the cart subtotal.
    Percentage {
        /// Percent of the subtotal to discount, e.g. `10` for 10% off.
        percent: Decimal,
    },

    /// Fixed amount off the cart subtotal, capped at the subtotal.
    FixedAmount {
        /// The fixed discount amount.
        amount: Money<'a, Currency>,
    },

    /// Every full set of `buy_count + free_count` units makes the cheapest
    /// `free_count` units free.
    BuyXGetXFree {
        /// Units that must be bought per set.
        buy_count: u32,
        /// Units given free per set.
        free_count: u32,
    },

    /// Every full set of `buy_count + 1` units discounts one additional unit.
    BuyXGetYPercentOff {
        /// Units that must be bought to unlock the discounted unit.
        buy_count: u32,
        /// Percent off the discounted unit.
        discount_percent: Decimal,
    },
}

impl DiscountCode {
    fn base(code: impl Into<String>, kind: KindTag) -> Self {
        Self {
            code: code.into(),
            kind,
            percent_value: None,
            fixed_value: None,
            buy_count: None,
            free_count: None,
            discount_percent: None,
            min_order_amount: None,
            max_uses: None,
            current_uses: 0,
            is_active: true,
            expires_at: None,
        }
    }

    /// Create an active percentage code.
    pub fn percentage(code: impl Into<String>, percent: Decimal) -> Self {
        Self {
            percent_value: Some(percent),
            ..Self::base(code, KindTag::Percentage)
        }
    }

    /// Create an active fixed-amount code (amount in minor units).
    pub fn fixed_amount(code: impl Into<String>, minor_units: i64) -> Self {
        Self {
            fixed_value: Some(minor_units),
            ..Self::base(code, KindTag::FixedAmount)
        }
    }

    /// Create an active buy-X-get-X-free code.
    pub fn buy_x_get_x_free(code: impl Into<String>, buy_count: u32, free_count: u32) -> Self {
        Self {
            buy_count: Some(buy_count),
            free_count: Some(free_count),
            ..Self::base(code, KindTag::BuyXGetXFree)
        }
    }

    /// Create an active buy-X-get-Y%-off code.
    pub fn buy_x_get_y_percent_off(
        code: impl Into<String>,
        buy_count: u32,
        discount_percent: Decimal,
    ) -> Self {
        Self {
            buy_count: Some(buy_count),
            discount_percent: Some(discount_percent),
            ..Self::base(code, KindTag::BuyXGetYPercentOff)
        }
    }

    /// Require a minimum order amount (minor units) before the code applies.
    #[must_use]
    pub fn with_min_order(mut self, minor_units: i64) -> Self {
        self.min_order_amount = Some(minor_units);
        self
    }

    /// Cap the number of redemptions.
    #[must_use]
    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    /// Set the redemptions recorded so far.
    #[must_use]
    pub fn with_current_uses(mut self, current_uses: u32) -> Self {
        self.current_uses = current_uses;
        self
    }

    /// Set an expiry moment.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Mark the code inactive.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// The code in its canonical upper-cased form.
    pub fn normalized_code(&self) -> String {
        normalize_code(&self.code)
    }

    /// Whether a claimed code names this record, case-insensitively.
    pub fn matches(&self, claimed: &str) -> bool {
        self.normalized_code() == normalize_code(claimed)
    }

    /// Derive the validated [`DiscountKind`] for this record.
    ///
    /// # Errors
    ///
    /// Returns a [`KindError`] if the kind tag is unrecognised, a field the
    /// kind requires is missing, a count is zero, or a percent or amount is
    /// negative.
    pub fn kind(&self, currency: &'static Currency) -> Result<DiscountKind<'static>, KindError> {
        match self.kind {
            KindTag::Percentage => {
                let percent = self
                    .percent_value
                    .ok_or(KindError::MissingField("percent_value"))?;
                if percent < Decimal::ZERO {
                    return Err(KindError::InvalidField("percent_value"));
                }
                Ok(DiscountKind::Percentage { percent })
            }
            KindTag::FixedAmount => {
                let minor_units = self
                    .fixed_value
                    .ok_or(KindError::MissingField("fixed_value"))?;
                if minor_units < 0 {
                    return Err(KindError::InvalidField("fixed_value"));
                }
                Ok(DiscountKind::FixedAmount {
                    amount: Money::from_minor(minor_units, currency),
                })
            }
            KindTag::BuyXGetXFree => {
                let buy_count = self.buy_count.ok_or(KindError::MissingField("buy_count"))?;
                let free_count = self
                    .free_count
                    .ok_or(KindError::MissingField("free_count"))?;
                if buy_count == 0 {
                    return Err(KindError::InvalidField("buy_count"));
                }
                if free_count == 0 {
                    return Err(KindError::InvalidField("free_count"));
                }
                Ok(DiscountKind::BuyXGetXFree {
                    buy_count,
                    free_count,
                })
            }
            KindTag::BuyXGetYPercentOff => {
                let buy_count = self.buy_count.ok_or(KindError::MissingField("buy_count"))?;
                let discount_percent = self
                    .discount_percent
                    .ok_or(KindError::MissingField("discount_percent"))?;
                if buy_count == 0 {
                    return Err(KindError::InvalidField("buy_count"));
                }
                if discount_percent < Decimal::ZERO {
                    return Err(KindError::InvalidField("discount_percent"));
                }
                Ok(DiscountKind::BuyXGetYPercentOff {
                    buy_count,
                    discount_percent,
                })
            }
            KindTag::Unknown => Err(KindError::UnknownKind),
        }
    }
}

/// Canonical form of a claimed code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

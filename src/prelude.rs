//! Vouch prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    allocation::{Allocated, AllocationPool},
    calculators::{
        CalculatorResult, Computed, buy_x_get_x_free, buy_x_get_y_percent_off,
        fixed_amount_discount, percentage_discount,
    },
    carts::{Cart, CartError, CartLine},
    codes::{CodeKey, DiscountCode, DiscountKind, KindError, KindTag, normalize_code},
    eligibility::check_eligibility,
    evaluation::{
        AppliedDiscount, Breakdown, DiscountedItem, Evaluation, EvaluationError, FreeItem,
        Rejection, evaluate,
    },
    fixtures::{FixtureError, FixtureSet, LineFixture},
    repository::{DiscountCodeRepository, InMemoryCodes, UsageCounterStore, UsageUpdate},
};

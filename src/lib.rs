//! Vouch
//!
//! Vouch is a pure discount-code evaluation engine for storefront checkouts:
//! given a discount-code record, a cart snapshot, and a timestamp, it decides
//! whether the code applies and computes the exact discount amount and which
//! cart lines receive the benefit. Evaluation is deterministic and
//! side-effect-free; persisting usage counters belongs to the checkout flow.

pub mod allocation;
pub mod calculators;
pub mod carts;
pub mod codes;
pub mod eligibility;
pub mod evaluation;
pub mod fixtures;
pub mod prelude;
pub mod repository;

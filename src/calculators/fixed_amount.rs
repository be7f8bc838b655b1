//! Fixed-Amount Discount
//!
//! A fixed amount off the subtotal, capped so the order can never go
//! negative.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::evaluation::Breakdown;

use super::{CalculatorResult, Computed};

/// Compute `min(amount, subtotal)`.
///
/// # Errors
///
/// Never rejects; the signature matches the other calculators so dispatch
/// stays uniform.
pub fn fixed_amount_discount<'a>(
    subtotal: &Money<'a, Currency>,
    amount: &Money<'a, Currency>,
) -> CalculatorResult<'a> {
    let capped = amount.to_minor_units().min(subtotal.to_minor_units());

    Ok(Computed {
        amount_minor: Decimal::from(capped),
        breakdown: Breakdown::FixedAmount,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn amount_below_subtotal_passes_through() -> TestResult {
        let subtotal = Money::from_minor(10_000, iso::GBP);
        let amount = Money::from_minor(2500, iso::GBP);

        let computed = fixed_amount_discount(&subtotal, &amount)?;

        assert_eq!(computed.amount_minor, Decimal::from(2500));
        assert_eq!(computed.breakdown, Breakdown::FixedAmount);

        Ok(())
    }

    #[test]
    fn amount_above_subtotal_is_capped() -> TestResult {
        let subtotal = Money::from_minor(8000, iso::GBP);
        let amount = Money::from_minor(10_000, iso::GBP);

        let computed = fixed_amount_discount(&subtotal, &amount)?;

        assert_eq!(computed.amount_minor, Decimal::from(8000));

        Ok(())
    }
}

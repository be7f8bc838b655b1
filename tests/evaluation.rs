//! Integration tests for the evaluation engine's end-to-end scenarios.
//!
//! Covers the canonical checkout scenarios (percentage, clamped fixed
//! amount, buy-2-get-1, buy-3-get-20%-off, expired codes) plus the engine's
//! cross-cutting properties: determinism, the subtotal clamp, set
//! conservation, and the allocator's stable cheapest-first ordering.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use testresult::TestResult;

use vouch::prelude::*;

fn line(id: &str, name: &str, minor: i64, quantity: u32) -> CartLine<'static> {
    CartLine::new(id, name, Money::from_minor(minor, iso::GBP), quantity)
}

fn applied_amount<'a>(evaluation: &Evaluation<'a>) -> Option<Money<'a, iso::Currency>> {
    evaluation.applied().map(|applied| applied.amount)
}

#[test]
fn percentage_code_takes_ten_percent_of_the_subtotal() -> TestResult {
    // Subtotal 500.00, SAVE10 at 10% -> 50.00 off.
    let cart = Cart::with_lines([line("sku-1", "Hamper", 50_000, 1)], iso::GBP)?;
    let code = DiscountCode::percentage("SAVE10", Decimal::from(10));

    let evaluation = evaluate(&code, &cart, Utc::now())?;

    assert_eq!(
        applied_amount(&evaluation),
        Some(Money::from_minor(5000, iso::GBP))
    );

    Ok(())
}

#[test]
fn fixed_amount_is_clamped_to_the_subtotal() -> TestResult {
    // Subtotal 80.00, FLAT100 worth 100.00 -> clamped to 80.00.
    let cart = Cart::with_lines([line("sku-1", "Kettle", 8000, 1)], iso::GBP)?;
    let code = DiscountCode::fixed_amount("FLAT100", 10_000);

    let evaluation = evaluate(&code, &cart, Utc::now())?;

    assert_eq!(
        applied_amount(&evaluation),
        Some(Money::from_minor(8000, iso::GBP))
    );

    Ok(())
}

#[test]
fn buy_two_get_one_frees_the_cheapest_unit() -> TestResult {
    // Three units form one full set; the 50.00 unit goes free.
    let cart = Cart::with_lines(
        [
            line("sku-dear", "Cafetiere", 10_000, 2),
            line("sku-cheap", "Mug", 5000, 1),
        ],
        iso::GBP,
    )?;
    let code = DiscountCode::buy_x_get_x_free("B2G1", 2, 1);

    let evaluation = evaluate(&code, &cart, Utc::now())?;

    assert_eq!(
        applied_amount(&evaluation),
        Some(Money::from_minor(5000, iso::GBP))
    );

    let Some(applied) = evaluation.applied() else {
        panic!("expected an applied discount, got {evaluation:?}")
    };
    match &applied.breakdown {
        Breakdown::FreeItems(free_items) => {
            assert_eq!(free_items.len(), 1);
            assert_eq!(
                free_items
                    .first()
                    .map(|item| (item.product_id.as_str(), item.name.as_str(), item.quantity)),
                Some(("sku-cheap", "Mug", 1))
            );
        }
        other => panic!("expected FreeItems breakdown, got {other:?}"),
    }

    Ok(())
}

#[test]
fn buy_two_get_one_with_only_two_units_names_the_gap() -> TestResult {
    let cart = Cart::with_lines([line("sku-dear", "Cafetiere", 10_000, 2)], iso::GBP)?;
    let code = DiscountCode::buy_x_get_x_free("B2G1", 2, 1);

    let evaluation = evaluate(&code, &cart, Utc::now())?;

    assert_eq!(
        evaluation.rejection(),
        Some(&Rejection::NeedsMoreForNextSet { needed: 1 })
    );

    Ok(())
}

#[test]
fn buy_three_get_twenty_percent_off_one_unit() -> TestResult {
    // Four units at 100.00 with buy=3: one unit discounted 20% -> 20.00 off.
    let cart = Cart::with_lines([line("sku-1", "Print", 10_000, 4)], iso::GBP)?;
    let code = DiscountCode::buy_x_get_y_percent_off("B3G20P", 3, Decimal::from(20));

    let evaluation = evaluate(&code, &cart, Utc::now())?;

    assert_eq!(
        applied_amount(&evaluation),
        Some(Money::from_minor(2000, iso::GBP))
    );

    Ok(())
}

#[test]
fn expired_code_is_rejected_whatever_the_cart() -> TestResult {
    let now = Utc::now();
    let code = DiscountCode::percentage("WINTER24", Decimal::from(15))
        .with_expiry(now - Duration::days(30));

    for cart in [
        Cart::new(iso::GBP),
        Cart::with_lines([line("sku-1", "Hamper", 50_000, 3)], iso::GBP)?,
    ] {
        let evaluation = evaluate(&code, &cart, now)?;
        assert_eq!(evaluation.rejection(), Some(&Rejection::Expired));
    }

    Ok(())
}

#[test]
fn evaluation_is_deterministic_and_side_effect_free() -> TestResult {
    let cart = Cart::with_lines(
        [
            line("sku-1", "Cafetiere", 10_000, 2),
            line("sku-2", "Mug", 5000, 3),
        ],
        iso::GBP,
    )?;
    let code = DiscountCode::buy_x_get_x_free("B2G1", 2, 1)
        .with_max_uses(10)
        .with_current_uses(3);
    let now = Utc::now();

    let first = evaluate(&code, &cart, now)?;

    for _ in 0..5 {
        assert_eq!(evaluate(&code, &cart, now)?, first);
    }

    // The engine never touches the usage counter.
    assert_eq!(code.current_uses, 3);

    Ok(())
}

#[test]
fn discount_never_exceeds_subtotal_for_any_kind() -> TestResult {
    let cart = Cart::with_lines([line("sku-1", "Mug", 1000, 2)], iso::GBP)?;
    let subtotal = cart.subtotal()?;

    let codes = [
        DiscountCode::percentage("P", Decimal::from(500)),
        DiscountCode::fixed_amount("F", 1_000_000),
        DiscountCode::buy_x_get_x_free("B", 1, 1),
        DiscountCode::buy_x_get_y_percent_off("Y", 1, Decimal::from(100)),
    ];

    for code in &codes {
        let evaluation = evaluate(code, &cart, Utc::now())?;
        let Some(amount) = applied_amount(&evaluation) else {
            panic!("expected an applied discount, got {evaluation:?}")
        };

        assert!(
            amount.to_minor_units() <= subtotal.to_minor_units(),
            "{} discounted more than the subtotal",
            code.code
        );
    }

    Ok(())
}

#[test]
fn free_unit_count_follows_set_conservation() -> TestResult {
    // 11 units, set size 5 (buy 3 get 2): 2 full sets -> 4 free units.
    let cart = Cart::with_lines(
        [
            line("sku-1", "Candle", 1200, 6),
            line("sku-2", "Matchbox", 300, 5),
        ],
        iso::GBP,
    )?;
    let code = DiscountCode::buy_x_get_x_free("B3G2", 3, 2);

    let evaluation = evaluate(&code, &cart, Utc::now())?;
    let Some(applied) = evaluation.applied() else {
        panic!("expected an applied discount, got {evaluation:?}")
    };

    match &applied.breakdown {
        Breakdown::FreeItems(free_items) => {
            let total_free: u32 = free_items.iter().map(|item| item.quantity).sum();
            assert_eq!(total_free, 4);

            for item in free_items {
                let Some(source) = cart
                    .lines()
                    .iter()
                    .find(|cart_line| cart_line.product_id() == item.product_id)
                else {
                    panic!("free item names a line that is not in the cart")
                };
                assert!(
                    item.quantity <= source.quantity(),
                    "allocated more units than the line holds"
                );
            }
        }
        other => panic!("expected FreeItems breakdown, got {other:?}"),
    }

    // 4 cheapest units: all 5 matchboxes are cheapest, 4 of them go free.
    assert_eq!(
        applied.amount,
        Money::from_minor(1200, iso::GBP)
    );

    Ok(())
}

#[test]
fn equal_prices_allocate_in_input_order() -> TestResult {
    let cart = Cart::with_lines(
        [
            line("sku-first", "Mug (blue)", 5000, 1),
            line("sku-second", "Mug (green)", 5000, 1),
            line("sku-third", "Teapot", 9000, 1),
        ],
        iso::GBP,
    )?;
    let code = DiscountCode::buy_x_get_x_free("B2G1", 2, 1);

    let evaluation = evaluate(&code, &cart, Utc::now())?;
    let Some(applied) = evaluation.applied() else {
        panic!("expected an applied discount, got {evaluation:?}")
    };

    match &applied.breakdown {
        Breakdown::FreeItems(free_items) => {
            assert_eq!(
                free_items.first().map(|item| item.product_id.as_str()),
                Some("sku-first")
            );
        }
        other => panic!("expected FreeItems breakdown, got {other:?}"),
    }

    Ok(())
}

#[test]
fn shrinking_subtotal_always_reports_the_exact_shortfall() -> TestResult {
    let code = DiscountCode::percentage("SAVE10", Decimal::from(10)).with_min_order(10_000);

    for subtotal_minor in [9999, 7500, 1, 0] {
        let cart = if subtotal_minor == 0 {
            Cart::new(iso::GBP)
        } else {
            Cart::with_lines([line("sku-1", "Hamper", subtotal_minor, 1)], iso::GBP)?
        };

        let evaluation = evaluate(&code, &cart, Utc::now())?;

        assert_eq!(
            evaluation.rejection(),
            Some(&Rejection::BelowMinimum {
                shortfall: Money::from_minor(10_000 - subtotal_minor, iso::GBP)
            })
        );
    }

    Ok(())
}

#[test]
fn line_order_never_changes_the_amount() -> TestResult {
    let forward = Cart::with_lines(
        [
            line("sku-1", "Cafetiere", 10_000, 2),
            line("sku-2", "Mug", 5000, 1),
        ],
        iso::GBP,
    )?;
    let reversed = Cart::with_lines(
        [
            line("sku-2", "Mug", 5000, 1),
            line("sku-1", "Cafetiere", 10_000, 2),
        ],
        iso::GBP,
    )?;

    let code = DiscountCode::buy_x_get_x_free("B2G1", 2, 1);
    let now = Utc::now();

    assert_eq!(
        applied_amount(&evaluate(&code, &forward, now)?),
        applied_amount(&evaluate(&code, &reversed, now)?),
    );

    Ok(())
}

#[test]
fn discounted_fragments_carry_their_own_amounts() -> TestResult {
    // 5 units, buy=1 (required 2): 2 discounted units, both the cheapest.
    let cart = Cart::with_lines(
        [
            line("sku-dear", "Teapot", 9000, 3),
            line("sku-cheap", "Coaster", 600, 2),
        ],
        iso::GBP,
    )?;
    let code = DiscountCode::buy_x_get_y_percent_off("HALFOFF", 1, Decimal::from(50));

    let evaluation = evaluate(&code, &cart, Utc::now())?;
    let Some(applied) = evaluation.applied() else {
        panic!("expected an applied discount, got {evaluation:?}")
    };

    // Both coasters discounted at 50%: 2 x 6.00 / 2 = 6.00.
    assert_eq!(applied.amount, Money::from_minor(600, iso::GBP));

    match &applied.breakdown {
        Breakdown::DiscountedItems(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(
                items.first().map(|item| (
                    item.product_id.as_str(),
                    item.quantity,
                    item.discount_amount
                )),
                Some(("sku-cheap", 2, Money::from_minor(600, iso::GBP)))
            );
        }
        other => panic!("expected DiscountedItems breakdown, got {other:?}"),
    }

    Ok(())
}

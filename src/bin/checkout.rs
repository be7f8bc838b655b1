//! Evaluate a discount code against a fixture cart and print the receipt.
//!
//! ```text
//! checkout --fixture storefront --code SAVE10
//! ```

use anyhow::{Context, bail};
use chrono::Utc;
use clap::Parser;
use rusty_money::Money;
use tabled::{Table, Tabled, settings::Style};

use vouch::prelude::*;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
struct Args {
    /// Fixture set to load the cart and codes from
    #[clap(short, long, default_value = "storefront")]
    fixture: String,

    /// Discount code claimed at checkout
    #[clap(short, long)]
    code: String,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Item")]
    item: String,

    #[tabled(rename = "Qty")]
    quantity: String,

    #[tabled(rename = "Amount")]
    amount: String,
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let set = FixtureSet::from_set(&args.fixture)
        .with_context(|| format!("loading fixture set {}", args.fixture))?;
    let cart = set.cart()?;
    let store = set.code_store();
    let subtotal = cart.subtotal()?;

    let Some(record) = store.find_active_by_code(&args.code) else {
        bail!("no active discount code named {}", args.code);
    };

    let mut rows: Vec<Row> = cart
        .lines()
        .iter()
        .map(|line| Row {
            item: line.name().to_string(),
            quantity: line.quantity().to_string(),
            amount: line.unit_price().to_string(),
        })
        .collect();

    match evaluate(record, &cart, Utc::now())? {
        Evaluation::Applied(applied) => {
            match &applied.breakdown {
                Breakdown::Percentage { percent } => rows.push(Row {
                    item: format!("{} ({percent}% off)", record.code),
                    quantity: String::new(),
                    amount: format!("-{}", applied.amount),
                }),
                Breakdown::FixedAmount => rows.push(Row {
                    item: format!("{} (fixed)", record.code),
                    quantity: String::new(),
                    amount: format!("-{}", applied.amount),
                }),
                Breakdown::FreeItems(free_items) => {
                    for item in free_items {
                        rows.push(Row {
                            item: format!("{} (free)", item.name),
                            quantity: item.quantity.to_string(),
                            amount: format!("-{}", item.unit_price),
                        });
                    }
                }
                Breakdown::DiscountedItems(discounted) => {
                    for item in discounted {
                        rows.push(Row {
                            item: format!("{} (discounted)", item.name),
                            quantity: item.quantity.to_string(),
                            amount: format!("-{}", item.discount_amount),
                        });
                    }
                }
            }

            let total = Money::from_minor(
                subtotal.to_minor_units() - applied.amount.to_minor_units(),
                cart.currency(),
            );

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!("Subtotal: {subtotal}");
            println!("Discount: -{}", applied.amount);
            println!("Total:    {total}");
        }
        Evaluation::Rejected(rejection) => {
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!("Subtotal: {subtotal}");
            println!("{}: {rejection}", record.code);
        }
    }

    Ok(())
}

use super::rates::load_conversion;
use super::ui;
use crate::core::conversion::{self, ConversionConfig, DisplayCurrency};
use crate::core::AdminApi;
use anyhow::{Result, bail};
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Canonical total projected into each display currency.
#[derive(Debug)]
pub struct Projection {
    pub total: Decimal,
    pub amounts: Vec<(DisplayCurrency, Decimal)>,
}

impl Projection {
    pub fn new(total: Decimal, currencies: &[DisplayCurrency], rates: &ConversionConfig) -> Self {
        let amounts = currencies
            .iter()
            .map(|c| (c.clone(), conversion::convert(total, c, Some(rates))))
            .collect();
        Projection { total, amounts }
    }

    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Amount")]);
        for (currency, amount) in &self.amounts {
            table.add_row(vec![
                Cell::new(currency.code()),
                ui::converted_cell(&currency.symbol(), *amount),
            ]);
        }

        format!(
            "{}: {}\n\n{}",
            ui::style_text("Total (CNY)", ui::StyleType::TotalLabel),
            ui::style_text(&format!("{:.2}", self.total), ui::StyleType::TotalValue),
            table
        )
    }
}

async fn resolve_conversion(
    api: &(dyn AdminApi + Send + Sync),
    fallback: &ConversionConfig,
    offline: bool,
) -> ConversionConfig {
    if offline {
        return fallback.clone();
    }
    let pb = ui::new_spinner("Loading conversion rates...");
    let (conversion, _) = load_conversion(api, fallback).await;
    pb.finish_and_clear();
    conversion
}

/// Projects an existing canonical total into the display currencies.
pub async fn run_convert(
    api: &(dyn AdminApi + Send + Sync),
    total: Decimal,
    currencies: &[DisplayCurrency],
    fallback: &ConversionConfig,
    offline: bool,
) -> Result<()> {
    if total < Decimal::ZERO {
        bail!("Total must not be negative, got {total}");
    }
    let conversion = resolve_conversion(api, fallback, offline).await;
    println!(
        "{}",
        Projection::new(total, currencies, &conversion).display_as_table()
    );
    Ok(())
}

/// Derives the canonical total for `amount × rate` and projects it.
pub async fn run_quote(
    api: &(dyn AdminApi + Send + Sync),
    amount: Decimal,
    rate: Decimal,
    currencies: &[DisplayCurrency],
    fallback: &ConversionConfig,
    offline: bool,
) -> Result<()> {
    let Some(total) = conversion::derive_total(amount, rate) else {
        bail!("Amount and exchange rate must both be greater than zero");
    };
    let conversion = resolve_conversion(api, fallback, offline).await;
    println!(
        "{}",
        Projection::new(total, currencies, &conversion).display_as_table()
    );
    Ok(())
}

use super::rates::load_conversion;
use super::ui;
use crate::core::conversion::{self, ConversionConfig, DisplayCurrency};
use crate::core::trade::TradePage;
use crate::core::AdminApi;
use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;
use tracing::{debug, error};

/// One page of trades together with the rates used to display them.
#[derive(Debug)]
pub struct TradeListing {
    pub page: u32,
    pub limit: u32,
    pub trades: TradePage,
    pub conversion: ConversionConfig,
    pub currencies: Vec<DisplayCurrency>,
}

impl TradeListing {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        let mut header = vec![
            ui::header_cell("ID"),
            ui::header_cell("Product"),
            ui::header_cell("Amount"),
            ui::header_cell("Rate (→CNY)"),
        ];
        for currency in &self.currencies {
            header.push(ui::header_cell(&format!(
                "Total ({})",
                currency.symbol().trim_end()
            )));
        }
        header.push(ui::header_cell("Time"));
        header.push(ui::header_cell("Status"));
        table.set_header(header);

        for trade in &self.trades.trades {
            let mut row = vec![
                Cell::new(trade.id),
                Cell::new(format!("{}\n{}", trade.product_name, trade.currency)),
                ui::amount_cell(ui::format_grouped(trade.amount)),
                ui::amount_cell(format!("{:.4}", trade.exchange_rate)),
            ];
            for currency in &self.currencies {
                let converted =
                    conversion::convert(trade.total_amount, currency, Some(&self.conversion));
                row.push(ui::converted_cell(&currency.symbol(), converted));
            }
            row.push(Cell::new(
                trade
                    .created_at
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M"),
            ));
            row.push(ui::status_cell(trade.status));
            table.add_row(row);
        }

        let mut output = format!("{}\n\n", ui::style_text("Trades", ui::StyleType::Title));
        if self.trades.trades.is_empty() {
            output.push_str(&ui::style_text("No trades yet", ui::StyleType::Subtle));
        } else {
            output.push_str(&table.to_string());
        }

        if let Some(footer) = self.pagination_footer() {
            output.push_str("\n\n");
            output.push_str(&footer);
        }
        output
    }

    fn pagination_footer(&self) -> Option<String> {
        let total_pages = self.trades.total_pages;
        if total_pages == 0 {
            return None;
        }

        let mut footer = format!(
            "Page {} / {}, {} records, {} per page",
            self.page, total_pages, self.trades.total, self.limit
        );
        let mut hints = Vec::new();
        if self.page > 1 {
            hints.push(format!("previous: --page {}", self.page - 1));
        }
        if u64::from(self.page) < total_pages {
            hints.push(format!("next: --page {}", self.page + 1));
        }
        if !hints.is_empty() {
            footer.push_str(&format!(
                "  {}",
                ui::style_text(&format!("({})", hints.join(", ")), ui::StyleType::Subtle)
            ));
        }
        Some(footer)
    }
}

/// Loads a page of trades and the display rates concurrently. Failures
/// degrade to an empty page and fallback rates.
pub async fn load(
    api: &(dyn AdminApi + Send + Sync),
    page: u32,
    limit: u32,
    currencies: &[DisplayCurrency],
    fallback: &ConversionConfig,
) -> TradeListing {
    let (trades, (conversion, _)) = futures::join!(
        api.fetch_trades(page, limit),
        load_conversion(api, fallback)
    );

    let trades = match trades {
        Ok(trades) => {
            debug!(count = trades.trades.len(), total = trades.total, "Loaded trades");
            trades
        }
        Err(e) => {
            error!(error = %e, "Failed to load trades");
            ui::notify_error(&format!("Failed to load trades: {e}"));
            TradePage::default()
        }
    };

    TradeListing {
        page,
        limit,
        trades,
        conversion,
        currencies: currencies.to_vec(),
    }
}

pub async fn run(
    api: &(dyn AdminApi + Send + Sync),
    page: u32,
    limit: u32,
    currencies: &[DisplayCurrency],
    fallback: &ConversionConfig,
) -> Result<()> {
    let pb = ui::new_spinner("Loading trades...");
    let listing = load(api, page, limit, currencies, fallback).await;
    pb.finish_and_clear();

    println!("{}", listing.display_as_table());
    Ok(())
}

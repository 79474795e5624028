use super::ui;
use crate::core::{AdminApi, ConversionConfig, DisplayCurrency};
use anyhow::Result;
use comfy_table::Cell;
use tracing::{debug, warn};

/// Where the display rates in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Backend,
    Fallback,
}

/// Loads the backend's display rates, filling gaps from `fallback`. A failed
/// fetch degrades to `fallback` with a warning.
pub async fn load_conversion(
    api: &(dyn AdminApi + Send + Sync),
    fallback: &ConversionConfig,
) -> (ConversionConfig, RateSource) {
    match api.fetch_conversion_config().await {
        Ok(mut conversion) => {
            conversion.merge_missing(fallback);
            debug!(?conversion, "Using backend conversion rates");
            (conversion, RateSource::Backend)
        }
        Err(e) => {
            warn!(error = %e, "Failed to load conversion config, using default rates");
            ui::notify_warning(&format!(
                "Could not load conversion rates ({e}); using default rates"
            ));
            (fallback.clone(), RateSource::Fallback)
        }
    }
}

pub fn display_rates_table(
    conversion: &ConversionConfig,
    currencies: &[DisplayCurrency],
    source: RateSource,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Rate (per 1 CNY)"),
    ]);

    for currency in currencies {
        let rate = conversion.effective_rate(currency).normalize();
        let rate = if conversion.has_rate(currency) {
            rate.to_string()
        } else {
            format!("{rate} (canonical)")
        };
        table.add_row(vec![Cell::new(currency.code()), ui::amount_cell(rate)]);
    }

    let source = match source {
        RateSource::Backend => "backend",
        RateSource::Fallback => "defaults",
    };
    format!(
        "{}\n\n{}\n{}",
        ui::style_text("Display rates", ui::StyleType::Title),
        table,
        ui::style_text(&format!("Source: {source}"), ui::StyleType::Subtle)
    )
}

pub async fn run(
    api: &(dyn AdminApi + Send + Sync),
    currencies: &[DisplayCurrency],
    fallback: &ConversionConfig,
) -> Result<()> {
    let pb = ui::new_spinner("Loading conversion rates...");
    let (conversion, source) = load_conversion(api, fallback).await;
    pb.finish_and_clear();

    println!("{}", display_rates_table(&conversion, currencies, source));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing::FakeApi;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_backend_rates_are_used() {
        let api = FakeApi::with_conversion(ConversionConfig::from_rates(Some(dec!(1500)), None));
        let mut fallback = ConversionConfig::default();
        fallback.set_rate(DisplayCurrency::new("KES"), dec!(18));

        let (conversion, source) = load_conversion(&api, &fallback).await;
        assert_eq!(source, RateSource::Backend);
        assert_eq!(conversion.rate(&DisplayCurrency::ngn()), Some(dec!(1500)));
        assert_eq!(conversion.rate(&DisplayCurrency::new("KES")), Some(dec!(18)));
    }

    #[tokio::test]
    async fn test_failed_fetch_uses_fallback() {
        let api = FakeApi::failing();
        let fallback = ConversionConfig::default();

        let (conversion, source) = load_conversion(&api, &fallback).await;
        assert_eq!(source, RateSource::Fallback);
        assert_eq!(conversion, fallback);
    }

    #[test]
    fn test_rates_table_matches_converted_amounts() {
        let kes = DisplayCurrency::new("KES");
        let conversion = ConversionConfig::default();
        let table = display_rates_table(&conversion, &[kes.clone()], RateSource::Backend);

        let shown = conversion.effective_rate(&kes);
        assert!(table.contains(&format!("{shown} (canonical)")));
        assert_eq!(
            crate::core::conversion::convert(dec!(100), &kes, Some(&conversion)),
            dec!(100) * shown
        );
    }

    #[test]
    fn test_rates_table_lists_each_currency() {
        let table = display_rates_table(
            &ConversionConfig::default(),
            &[DisplayCurrency::ngn(), DisplayCurrency::ghc(), DisplayCurrency::new("KES")],
            RateSource::Fallback,
        );
        assert!(table.contains("NGN"));
        assert!(table.contains("200"));
        assert!(table.contains("GHC"));
        assert!(table.contains("1 (canonical)"));
        assert!(table.contains("defaults"));
    }
}

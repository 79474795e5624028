//! Trade records and the form used to create or edit them.

use crate::core::conversion::{self, ConversionError};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Anything the backend reports other than `completed` reads as processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Completed,
    #[serde(other)]
    Processing,
}

impl Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TradeStatus::Completed => "completed",
                TradeStatus::Processing => "processing",
            }
        )
    }
}

impl FromStr for TradeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(TradeStatus::Completed),
            "processing" => Ok(TradeStatus::Processing),
            _ => Err(anyhow!("Invalid trade status: {}", s)),
        }
    }
}

/// A trade as stored by the backend. `total_amount` is in the canonical currency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    pub product_name: String,
    pub currency: String,
    pub amount: Decimal,
    pub exchange_rate: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or updating a trade. The backend assigns `id` and
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    pub product_name: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub exchange_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: TradeStatus,
}

/// One page of trades as returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePage {
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeFormError {
    #[error("please fill in all required fields (missing {0})")]
    MissingField(&'static str),
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error(transparent)]
    Total(#[from] ConversionError),
}

/// Free-text trade input. Numbers stay as entered until [`TradeForm::submit`]
/// parses them, and the total follows `amount × exchange_rate` as those change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeForm {
    product_name: String,
    currency: String,
    amount: String,
    exchange_rate: String,
    total_amount: String,
    status: TradeStatus,
}

impl TradeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form from an existing trade for editing.
    pub fn from_trade(trade: &Trade) -> Self {
        TradeForm {
            product_name: trade.product_name.clone(),
            currency: trade.currency.clone(),
            amount: trade.amount.to_string(),
            exchange_rate: trade.exchange_rate.to_string(),
            total_amount: trade.total_amount.to_string(),
            status: trade.status,
        }
    }

    pub fn set_product_name(&mut self, value: &str) {
        self.product_name = value.to_string();
    }

    pub fn set_currency(&mut self, value: &str) {
        self.currency = value.to_string();
    }

    pub fn set_amount(&mut self, value: &str) {
        self.amount = value.to_string();
        self.recompute_total();
    }

    pub fn set_exchange_rate(&mut self, value: &str) {
        self.exchange_rate = value.to_string();
        self.recompute_total();
    }

    /// Overrides the derived total. The value is still checked on submit.
    pub fn set_total_amount(&mut self, value: &str) {
        self.total_amount = value.to_string();
    }

    pub fn set_status(&mut self, status: TradeStatus) {
        self.status = status;
    }

    pub fn total_amount(&self) -> &str {
        &self.total_amount
    }

    fn recompute_total(&mut self) {
        let amount = Decimal::from_str(self.amount.trim()).ok();
        let rate = Decimal::from_str(self.exchange_rate.trim()).ok();
        if let Some(total) = amount
            .zip(rate)
            .and_then(|(amount, rate)| conversion::derive_total(amount, rate))
        {
            self.total_amount = format!("{total:.2}");
            debug!(total = %self.total_amount, "Recomputed trade total");
        }
    }

    /// Parses and validates the form into a payload ready to save.
    pub fn submit(&self) -> Result<TradeDraft, TradeFormError> {
        let product_name = required("product name", &self.product_name)?;
        let currency = required("currency", &self.currency)?;
        let amount = required("amount", &self.amount)?;
        let exchange_rate = required("exchange rate", &self.exchange_rate)?;
        let total_amount = required("total amount", &self.total_amount)?;

        let amount = positive("amount", parse_decimal("amount", amount)?)?;
        let exchange_rate = positive(
            "exchange rate",
            parse_decimal("exchange rate", exchange_rate)?,
        )?;
        let total_amount = parse_decimal("total amount", total_amount)?;

        conversion::validate_total(amount, exchange_rate, total_amount)?;

        Ok(TradeDraft {
            product_name: product_name.to_string(),
            currency: currency.to_string(),
            amount,
            exchange_rate,
            total_amount,
            status: self.status,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, TradeFormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(TradeFormError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, TradeFormError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| TradeFormError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn positive(field: &'static str, value: Decimal) -> Result<Decimal, TradeFormError> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(TradeFormError::NotPositive(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn filled_form() -> TradeForm {
        let mut form = TradeForm::new();
        form.set_product_name("Steam US");
        form.set_currency("USD");
        form.set_amount("500");
        form.set_exchange_rate("5.4");
        form
    }

    #[test]
    fn test_total_follows_amount_and_rate() {
        let mut form = filled_form();
        assert_eq!(form.total_amount(), "2700.00");

        form.set_amount("100");
        assert_eq!(form.total_amount(), "540.00");

        form.set_exchange_rate("7.2513");
        assert_eq!(form.total_amount(), "725.13");
    }

    #[test]
    fn test_invalid_input_keeps_previous_total() {
        let mut form = filled_form();
        form.set_amount("abc");
        assert_eq!(form.total_amount(), "2700.00");
        form.set_amount("-3");
        assert_eq!(form.total_amount(), "2700.00");
        form.set_exchange_rate("");
        assert_eq!(form.total_amount(), "2700.00");
    }

    #[test]
    fn test_total_is_not_computed_until_both_inputs_are_present() {
        let mut form = TradeForm::new();
        form.set_amount("500");
        assert_eq!(form.total_amount(), "");
    }

    #[test]
    fn test_submit_builds_draft() {
        let mut form = filled_form();
        form.set_status(TradeStatus::Processing);

        let draft = form.submit().unwrap();
        assert_eq!(
            draft,
            TradeDraft {
                product_name: "Steam US".to_string(),
                currency: "USD".to_string(),
                amount: dec!(500),
                exchange_rate: dec!(5.4),
                total_amount: dec!(2700.00),
                status: TradeStatus::Processing,
            }
        );
    }

    #[test]
    fn test_submit_requires_all_fields() {
        let mut form = filled_form();
        form.set_currency("  ");
        assert_eq!(
            form.submit().unwrap_err(),
            TradeFormError::MissingField("currency")
        );

        let form = TradeForm::new();
        assert_eq!(
            form.submit().unwrap_err(),
            TradeFormError::MissingField("product name")
        );
    }

    #[test]
    fn test_submit_rejects_bad_numbers() {
        let mut form = filled_form();
        form.set_total_amount("lots");
        assert_eq!(
            form.submit().unwrap_err(),
            TradeFormError::InvalidNumber {
                field: "total amount",
                value: "lots".to_string()
            }
        );

        let mut form = filled_form();
        form.set_exchange_rate("0");
        assert_eq!(
            form.submit().unwrap_err(),
            TradeFormError::NotPositive("exchange rate")
        );
    }

    #[test]
    fn test_submit_blocks_mismatched_total() {
        let mut form = filled_form();
        form.set_total_amount("2701");
        let err = form.submit().unwrap_err();
        assert!(matches!(
            err,
            TradeFormError::Total(ConversionError::Mismatch { .. })
        ));
        assert!(err.to_string().contains("2700.00"));

        form.set_total_amount("2700.01");
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_edit_form_round_trips_existing_trade() {
        let trade: Trade = serde_json::from_str(
            r#"{"id": 7, "productName": "Xbox", "currency": "USD", "amount": "100.00",
                "exchangeRate": 7.25, "totalAmount": "725.00", "status": "processing",
                "createdAt": "2025-03-01T10:30:00.000Z"}"#,
        )
        .unwrap();

        let form = TradeForm::from_trade(&trade);
        let draft = form.submit().unwrap();
        assert_eq!(draft.total_amount, dec!(725));
        assert_eq!(draft.status, TradeStatus::Processing);
    }

    #[test]
    fn test_draft_serializes_numbers_as_json_numbers() {
        let draft = filled_form().submit().unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productName": "Steam US",
                "currency": "USD",
                "amount": 500.0,
                "exchangeRate": 5.4,
                "totalAmount": 2700.0,
                "status": "completed"
            })
        );
    }

    #[test]
    fn test_trade_page_defaults_missing_fields() {
        let page: TradePage = serde_json::from_str("{}").unwrap();
        assert_eq!(page, TradePage::default());
    }

    #[test]
    fn test_unknown_status_does_not_drop_the_page() {
        let page: TradePage = serde_json::from_str(
            r#"{"trades": [
                {"id": 1, "productName": "Steam US", "currency": "USD", "amount": 500,
                 "exchangeRate": 5.4, "totalAmount": 2700, "status": "completed",
                 "createdAt": "2025-05-01T08:00:00Z"},
                {"id": 2, "productName": "Apple", "currency": "GBP", "amount": 50,
                 "exchangeRate": 9.1, "totalAmount": 455, "status": "pending",
                 "createdAt": "2025-05-02T08:00:00Z"}
            ], "total": 2, "totalPages": 1}"#,
        )
        .unwrap();

        assert_eq!(page.trades.len(), 2);
        assert_eq!(page.trades[0].status, TradeStatus::Completed);
        assert_eq!(page.trades[1].status, TradeStatus::Processing);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "Completed".parse::<TradeStatus>().unwrap(),
            TradeStatus::Completed
        );
        assert_eq!(
            "processing".parse::<TradeStatus>().unwrap(),
            TradeStatus::Processing
        );
        assert!("pending".parse::<TradeStatus>().is_err());
    }
}

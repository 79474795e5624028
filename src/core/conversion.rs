//! Canonical total derivation, reconciliation and display-currency projection.
//!
//! Every trade carries its total in the canonical currency (CNY). Totals are
//! derived as `amount × exchange_rate` and projected into display currencies
//! (NGN, GHC, ...) by a configured multiplier, floored to whole units.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;
use tracing::warn;

/// Maximum absolute difference accepted between a submitted total and
/// `amount × exchange_rate`, in canonical currency units.
pub const TOTAL_TOLERANCE: Decimal = dec!(0.01);

pub const DEFAULT_NGN_RATE: Decimal = dec!(200);
pub const DEFAULT_GHC_RATE: Decimal = dec!(1.0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("total should be {expected:.2} (amount × rate), got {submitted}")]
    Mismatch {
        expected: Decimal,
        submitted: Decimal,
    },
    #[error("amount × rate overflows")]
    Overflow,
}

/// A display currency code such as `NGN` or `GHC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DisplayCurrency(String);

impl From<String> for DisplayCurrency {
    fn from(code: String) -> Self {
        DisplayCurrency::new(&code)
    }
}

impl From<DisplayCurrency> for String {
    fn from(currency: DisplayCurrency) -> Self {
        currency.0
    }
}

impl DisplayCurrency {
    pub fn new(code: &str) -> Self {
        DisplayCurrency(code.trim().to_uppercase())
    }

    pub fn ngn() -> Self {
        Self::new("NGN")
    }

    pub fn ghc() -> Self {
        Self::new("GHC")
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Prefix used when rendering amounts in this currency.
    pub fn symbol(&self) -> String {
        match self.0.as_str() {
            "NGN" => "₦".to_string(),
            "GHC" => "GH₵".to_string(),
            other => format!("{other} "),
        }
    }
}

impl Display for DisplayCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical-to-display multipliers keyed by currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    rates: BTreeMap<DisplayCurrency, Decimal>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(DisplayCurrency::ngn(), DEFAULT_NGN_RATE);
        rates.insert(DisplayCurrency::ghc(), DEFAULT_GHC_RATE);
        ConversionConfig { rates }
    }
}

impl ConversionConfig {
    /// Builds a config from the backend's `ngnRate`/`ghcRate` pair. Missing or
    /// non-positive values fall back to the defaults.
    pub fn from_rates(ngn_rate: Option<Decimal>, ghc_rate: Option<Decimal>) -> Self {
        let mut config = Self::default();
        if let Some(rate) = ngn_rate {
            config.set_rate(DisplayCurrency::ngn(), rate);
        }
        if let Some(rate) = ghc_rate {
            config.set_rate(DisplayCurrency::ghc(), rate);
        }
        config
    }

    /// Sets the rate for `currency`, ignoring non-positive values.
    pub fn set_rate(&mut self, currency: DisplayCurrency, rate: Decimal) {
        if rate > Decimal::ZERO {
            self.rates.insert(currency, rate);
        } else {
            warn!(%currency, %rate, "Ignoring non-positive display rate");
        }
    }

    /// Fills in rates from `other` for currencies this config does not have.
    pub fn merge_missing(&mut self, other: &ConversionConfig) {
        for (currency, rate) in &other.rates {
            self.rates.entry(currency.clone()).or_insert(*rate);
        }
    }

    pub fn rate(&self, currency: &DisplayCurrency) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    /// Whether `currency` has a rate here or among the built-in defaults.
    pub fn has_rate(&self, currency: &DisplayCurrency) -> bool {
        self.known_rate(currency).is_some()
    }

    /// The multiplier [`convert`] applies for `currency`. Currencies without
    /// a known rate display the canonical amount.
    pub fn effective_rate(&self, currency: &DisplayCurrency) -> Decimal {
        self.known_rate(currency).unwrap_or_else(|| {
            warn!(%currency, "No rate configured, displaying canonical amount");
            Decimal::ONE
        })
    }

    fn known_rate(&self, currency: &DisplayCurrency) -> Option<Decimal> {
        self.rate(currency).or_else(|| ConversionConfig::default().rate(currency))
    }
}

/// Derives the canonical total rounded to two decimals.
///
/// Returns `None` when either input is not strictly positive or the product
/// does not fit, in which case the caller keeps its previous total.
pub fn derive_total(amount: Decimal, exchange_rate: Decimal) -> Option<Decimal> {
    if amount <= Decimal::ZERO || exchange_rate <= Decimal::ZERO {
        return None;
    }
    amount
        .checked_mul(exchange_rate)
        .map(|total| total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Checks that `submitted` is within [`TOTAL_TOLERANCE`] of the unrounded
/// `amount × exchange_rate`.
pub fn validate_total(
    amount: Decimal,
    exchange_rate: Decimal,
    submitted: Decimal,
) -> Result<(), ConversionError> {
    let expected = amount
        .checked_mul(exchange_rate)
        .ok_or(ConversionError::Overflow)?;
    let difference = submitted
        .checked_sub(expected)
        .ok_or(ConversionError::Overflow)?
        .abs();

    if difference <= TOTAL_TOLERANCE {
        Ok(())
    } else {
        Err(ConversionError::Mismatch {
            expected,
            submitted,
        })
    }
}

/// Projects a canonical total into `currency`, floored to whole units.
///
/// Without a config the built-in defaults are used. This never fails; a
/// product too large to represent saturates at `Decimal::MAX`.
pub fn convert(
    total: Decimal,
    currency: &DisplayCurrency,
    config: Option<&ConversionConfig>,
) -> Decimal {
    let rate = match config {
        Some(config) => config.effective_rate(currency),
        None => ConversionConfig::default().effective_rate(currency),
    };
    total.saturating_mul(rate).floor()
}

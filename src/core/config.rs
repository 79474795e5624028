use crate::core::conversion::{ConversionConfig, DisplayCurrency};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const BACKEND_URL_ENV: &str = "TRADEDESK_BACKEND_URL";
pub const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with admin requests.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:5001".to_string(),
            token: None,
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_display_currencies() -> Vec<DisplayCurrency> {
    vec![DisplayCurrency::ngn(), DisplayCurrency::ghc()]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_display_currencies")]
    pub display_currencies: Vec<DisplayCurrency>,
    /// Rates used when the backend does not supply one for a currency.
    #[serde(default)]
    pub fallback_rates: BTreeMap<DisplayCurrency, Decimal>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: ApiConfig::default(),
            page_size: default_page_size(),
            display_currencies: default_display_currencies(),
            fallback_rates: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Self::default().with_env_overrides().validated();
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tradedesk", "tradedesk")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        config.with_env_overrides().validated()
    }

    fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Using backend URL from {BACKEND_URL_ENV}");
                self.api.base_url = url;
            }
        }
        self
    }

    fn validated(self) -> Result<Self> {
        if !PAGE_SIZES.contains(&self.page_size) {
            bail!(
                "Invalid page_size {}: expected one of {:?}",
                self.page_size,
                PAGE_SIZES
            );
        }
        if self.display_currencies.is_empty() {
            bail!("display_currencies must list at least one currency");
        }
        if let Some((currency, rate)) = self
            .fallback_rates
            .iter()
            .find(|(_, rate)| **rate <= Decimal::ZERO)
        {
            bail!("Fallback rate for {currency} must be positive, got {rate}");
        }
        Ok(self)
    }

    /// Built-in defaults overlaid with the configured fallback rates.
    pub fn fallback_conversion(&self) -> ConversionConfig {
        let mut conversion = ConversionConfig::default();
        for (currency, rate) in &self.fallback_rates {
            conversion.set_rate(currency.clone(), *rate);
        }
        conversion
    }
}

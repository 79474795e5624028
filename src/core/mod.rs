//! Core business logic abstractions

pub mod api;
pub mod config;
pub mod conversion;
pub mod log;
pub mod social;
pub mod trade;

// Re-export main types for cleaner imports
pub use api::{AdminApi, PublicApi};
pub use conversion::{ConversionConfig, ConversionError, DisplayCurrency};
pub use trade::{Trade, TradeDraft, TradeForm, TradePage, TradeStatus};

//! Backend API abstractions

use crate::core::conversion::ConversionConfig;
use crate::core::social::SocialButton;
use crate::core::trade::{TradeDraft, TradePage};
use anyhow::Result;
use async_trait::async_trait;

/// Administrative endpoints for trades and display rates.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_conversion_config(&self) -> Result<ConversionConfig>;
    async fn fetch_trades(&self, page: u32, limit: u32) -> Result<TradePage>;
    async fn create_trade(&self, draft: &TradeDraft) -> Result<()>;
    async fn update_trade(&self, id: u64, draft: &TradeDraft) -> Result<()>;
    async fn delete_trade(&self, id: u64) -> Result<()>;
}

/// Unauthenticated endpoints used by the public pages.
#[async_trait]
pub trait PublicApi: Send + Sync {
    async fn fetch_social_buttons(&self) -> Result<Vec<SocialButton>>;
}

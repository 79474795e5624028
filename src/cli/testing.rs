//! In-memory backend used by the command tests.

use crate::core::api::{AdminApi, PublicApi};
use crate::core::conversion::ConversionConfig;
use crate::core::social::SocialButton;
use crate::core::trade::{TradeDraft, TradePage};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;

/// Unset responses fail like an unreachable backend.
#[derive(Default)]
pub struct FakeApi {
    pub conversion: Option<ConversionConfig>,
    pub page: Option<TradePage>,
    pub buttons: Option<Vec<SocialButton>>,
    pub fail_writes: bool,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) drafts: Mutex<Vec<TradeDraft>>,
}

impl FakeApi {
    pub fn failing() -> Self {
        FakeApi {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn with_conversion(conversion: ConversionConfig) -> Self {
        FakeApi {
            conversion: Some(conversion),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn drafts(&self) -> Vec<TradeDraft> {
        self.drafts.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write(&self, call: String, draft: Option<&TradeDraft>) -> Result<()> {
        self.record(call);
        if self.fail_writes {
            return Err(anyhow!("connection refused"));
        }
        if let Some(draft) = draft {
            self.drafts.lock().unwrap().push(draft.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn fetch_conversion_config(&self) -> Result<ConversionConfig> {
        self.record("conversion-config".to_string());
        self.conversion
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }

    async fn fetch_trades(&self, page: u32, limit: u32) -> Result<TradePage> {
        self.record(format!("trades?page={page}&limit={limit}"));
        self.page.clone().ok_or_else(|| anyhow!("connection refused"))
    }

    async fn create_trade(&self, draft: &TradeDraft) -> Result<()> {
        self.write("create".to_string(), Some(draft))
    }

    async fn update_trade(&self, id: u64, draft: &TradeDraft) -> Result<()> {
        self.write(format!("update {id}"), Some(draft))
    }

    async fn delete_trade(&self, id: u64) -> Result<()> {
        self.write(format!("delete {id}"), None)
    }
}

#[async_trait]
impl PublicApi for FakeApi {
    async fn fetch_social_buttons(&self) -> Result<Vec<SocialButton>> {
        self.record("social-buttons".to_string());
        self.buttons.clone().ok_or_else(|| anyhow!("connection refused"))
    }
}

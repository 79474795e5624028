use super::ui;
use crate::core::PublicApi;
use crate::core::social::whatsapp_url;
use anyhow::Result;
use tracing::{debug, error};

/// Resolves the WhatsApp link behind the referral "start earning" button.
/// Returns `None` when it is not configured or cannot be loaded.
pub async fn resolve(api: &(dyn PublicApi + Send + Sync)) -> Option<String> {
    match api.fetch_social_buttons().await {
        Ok(buttons) => {
            debug!(count = buttons.len(), "Loaded social buttons");
            whatsapp_url(&buttons).map(str::to_string)
        }
        Err(e) => {
            error!(error = %e, "Failed to load WhatsApp link");
            None
        }
    }
}

pub async fn run(api: &(dyn PublicApi + Send + Sync)) -> Result<()> {
    match resolve(api).await {
        Some(url) => println!(
            "{} {}",
            ui::style_text("Start earning:", ui::StyleType::TotalLabel),
            url
        ),
        None => ui::notify_warning("WhatsApp link is not configured"),
    }
    Ok(())
}

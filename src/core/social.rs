//! Social contact buttons configured on the backend.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialButton {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    pub url: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_active: bool,
}

/// Returns the URL of the first active WhatsApp button, in `sort_order`.
pub fn whatsapp_url(buttons: &[SocialButton]) -> Option<&str> {
    let mut candidates: Vec<&SocialButton> = buttons
        .iter()
        .filter(|b| b.kind.eq_ignore_ascii_case("whatsapp") && b.is_active)
        .collect();
    candidates.sort_by_key(|b| b.sort_order);
    candidates
        .into_iter()
        .filter_map(|b| b.url.as_deref())
        .map(str::trim)
        .find(|url| !url.is_empty())
}

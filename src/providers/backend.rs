use crate::core::api::{AdminApi, PublicApi};
use crate::core::config::ApiConfig;
use crate::core::conversion::ConversionConfig;
use crate::core::social::SocialButton;
use crate::core::trade::{TradeDraft, TradePage};
use crate::providers::util::{GET_RETRIES, RETRY_DELAY_MS, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// HTTP client for the trade backend's admin and public endpoints.
pub struct BackendClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tradedesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(BackendClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.base_url, endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, admin: bool) -> Result<T> {
        let url = self.url(endpoint);
        debug!("Requesting {}", url);

        let response = with_retry(
            || {
                let request = self.client.get(&url);
                let request = if admin { self.authorized(request) } else { request };
                request.send()
            },
            GET_RETRIES,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Request failed: {url}"))?;

        let response = check_status(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {url}"))?;

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse response from {url}. Response: '{text}'"))
    }

    async fn send_write(&self, request: RequestBuilder, url: &str) -> Result<()> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;
        check_status(response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turns a non-success response into an error, preferring the backend's
/// `message` field over the bare status.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match message {
        Some(message) => Err(anyhow!("{message} (HTTP {status})")),
        None => Err(anyhow!("HTTP error: {status}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversionConfigResponse {
    ngn_rate: Option<Decimal>,
    ghc_rate: Option<Decimal>,
}

#[async_trait]
impl AdminApi for BackendClient {
    #[instrument(name = "FetchConversionConfig", skip(self))]
    async fn fetch_conversion_config(&self) -> Result<ConversionConfig> {
        let response: ConversionConfigResponse =
            self.get_json("/admin/conversion-config", true).await?;
        debug!(?response, "Received conversion config");
        Ok(ConversionConfig::from_rates(
            response.ngn_rate,
            response.ghc_rate,
        ))
    }

    #[instrument(name = "FetchTrades", skip(self))]
    async fn fetch_trades(&self, page: u32, limit: u32) -> Result<TradePage> {
        self.get_json(&format!("/admin/trades?page={page}&limit={limit}"), true)
            .await
    }

    #[instrument(name = "CreateTrade", skip(self, draft))]
    async fn create_trade(&self, draft: &TradeDraft) -> Result<()> {
        let url = self.url("/admin/trades");
        debug!(?draft, "Creating trade");
        self.send_write(self.client.post(&url).json(draft), &url)
            .await
    }

    #[instrument(name = "UpdateTrade", skip(self, draft))]
    async fn update_trade(&self, id: u64, draft: &TradeDraft) -> Result<()> {
        let url = self.url(&format!("/admin/trades/{id}"));
        debug!(?draft, "Updating trade");
        self.send_write(self.client.put(&url).json(draft), &url)
            .await
    }

    #[instrument(name = "DeleteTrade", skip(self))]
    async fn delete_trade(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("/admin/trades/{id}"));
        self.send_write(self.client.delete(&url), &url).await
    }
}

#[async_trait]
impl PublicApi for BackendClient {
    #[instrument(name = "FetchSocialButtons", skip(self))]
    async fn fetch_social_buttons(&self) -> Result<Vec<SocialButton>> {
        let buttons: Option<Vec<SocialButton>> =
            self.get_json("/public/social-buttons", false).await?;
        Ok(buttons.unwrap_or_default())
    }
}

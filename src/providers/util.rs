use anyhow::{Error, anyhow};
use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const GET_RETRIES: usize = 3;
pub const RETRY_DELAY_MS: u64 = 500;

/// Retries an idempotent request on transport failures and 5xx responses.
///
/// # Parameters
/// - `operation`: Closure returning the request future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// The first response that is not a server error, or the last failure
pub async fn with_retry<F, Fut>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<Response, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        let err: Error = match operation().await {
            Ok(response) if !response.status().is_server_error() => return Ok(response),
            Ok(response) if attempt > retries => return Ok(response),
            Ok(response) => anyhow!("Server error: {}", response.status()),
            Err(err) if attempt > retries => return Err(err.into()),
            Err(err) => err.into(),
        };
        debug!(
            "Attempt {}/{} failed: {}. Retrying...",
            attempt, retries, err
        );
        attempt += 1;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

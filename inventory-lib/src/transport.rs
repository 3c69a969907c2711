//! Retrying HTTP send shared by the inventory client and the table fetcher.

use std::time::Duration;

use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::RequestBuilder;

use crate::error::ApiError;
use crate::retry::RetryConfig;

/// Sends a request, retrying transient failures per `retry`.
///
/// `make` is called once per attempt so bodies that cannot be cloned
/// (multipart forms) are rebuilt each time. Any response that is not retried
/// is returned as-is, including 4xx and a final 5xx/429; only transport
/// failures become `Err`.
pub(crate) async fn send_with_retry<F>(
    client: &Client,
    retry: &RetryConfig,
    timeout: Option<Duration>,
    make: F,
) -> Result<reqwest::Response, ApiError>
where
    F: Fn(&Client) -> RequestBuilder,
{
    let mut attempts = 0;
    let mut delay = retry.initial_delay;

    loop {
        let mut request = make(client);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if !retry.should_retry_status(status, attempts) {
                    return Ok(response);
                }

                let wait = if status == 429 {
                    parse_retry_after(&response).unwrap_or(delay)
                } else {
                    delay
                };
                debug!(
                    "{} answered {}, retrying in {:?} (attempt {})",
                    response.url(),
                    status,
                    wait,
                    attempts + 1
                );
                tokio::time::sleep(wait).await;
                delay = retry.next_delay(delay);
                attempts += 1;
            }
            Err(e) => {
                if e.is_timeout() && !retry.retry_on_network {
                    return Err(ApiError::Timeout(timeout.unwrap_or_default()));
                }
                if retry.retry_on_network && attempts < retry.max_retries {
                    warn!("request failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    delay = retry.next_delay(delay);
                    attempts += 1;
                    continue;
                }
                if e.is_timeout() {
                    return Err(ApiError::Timeout(timeout.unwrap_or_default()));
                }
                return Err(ApiError::Network(e));
            }
        }
    }
}

/// Parses the Retry-After header value (seconds).
pub(crate) fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

//! Snowtrace stats API client for ecosystem health figures.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument, Instrument};
use url::Url;

use super::backend::REQUEST_TIMEOUT;
use crate::error::{Result, SnowprintError};
use crate::protocol::{latency_millis, StatsResponse, ValidatorHealth};
use crate::spans;
use crate::traits::HealthApi;

/// Public Snowtrace API endpoint.
pub const DEFAULT_SNOWTRACE_URL: &str = "https://api.snowtrace.io/api";

/// Production [`HealthApi`] backed by the Snowtrace `stats` module.
///
/// # Examples
///
/// ```rust,no_run
/// use snowprint::providers::{SnowtraceClient, DEFAULT_SNOWTRACE_URL};
/// use snowprint::traits::HealthApi;
///
/// # async fn example() -> Result<(), snowprint::SnowprintError> {
/// let api = SnowtraceClient::new(DEFAULT_SNOWTRACE_URL, Some("my-api-key".to_string()))?;
/// println!("latency {} ms", api.latency_ms().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SnowtraceClient {
    base_url: Url,
    api_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for SnowtraceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowtraceClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SnowtraceClient {
    /// Creates a client for the stats API at `base_url`.
    ///
    /// Without an API key requests go out unauthenticated and are subject to
    /// Snowtrace's anonymous rate limit.
    pub fn new(base_url: impl AsRef<str>, api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|e| SnowprintError::InvalidUrl {
            reason: format!("Invalid Snowtrace URL: {e}"),
        })?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for a `stats` action, without the API key.
    fn action_url(&self, action: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("module", "stats")
            .append_pair("action", action);
        url
    }

    async fn stats(&self, action: &str) -> Result<serde_json::Value> {
        let url = self.action_url(action);
        let span = spans::http_request("GET", &url);

        async {
            let mut request_url = url.clone();
            if let Some(key) = &self.api_key {
                request_url.query_pairs_mut().append_pair("apikey", key);
            }

            let response = self.client.get(request_url).send().await?;
            let status_code = response.status();
            tracing::Span::current().record("http.status_code", status_code.as_u16());

            if let Err(e) = response.error_for_status_ref() {
                spans::record_error(&e);
                error!(
                    action = action,
                    status_code = %status_code,
                    event = "snowtrace_request_failed"
                );
                return Err(SnowprintError::Network(e));
            }

            let body: StatsResponse = response.json().await?;
            let result = body.into_result().inspect_err(|e| {
                error!(action = action, error = %e, event = "snowtrace_reported_error");
            })?;
            debug!(action = action, event = "snowtrace_response_parsed");
            Ok(result)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl HealthApi for SnowtraceClient {
    #[instrument(skip(self))]
    async fn validators(&self) -> Result<Vec<ValidatorHealth>> {
        let result = self.stats("validators").await?;
        Ok(serde_json::from_value(result)?)
    }

    #[instrument(skip(self))]
    async fn latency_ms(&self) -> Result<f64> {
        let result = self.stats("latency").await?;
        latency_millis(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_url_leaves_out_key() {
        let client =
            SnowtraceClient::new(DEFAULT_SNOWTRACE_URL, Some("secret".to_string())).unwrap();
        insta::assert_snapshot!(
            client.action_url("validators"),
            @"https://api.snowtrace.io/api?module=stats&action=validators"
        );
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_invalid_url() {
        let result = SnowtraceClient::new("snowtrace", None);
        assert!(matches!(result, Err(SnowprintError::InvalidUrl { .. })));
    }
}

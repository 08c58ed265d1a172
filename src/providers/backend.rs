//! Explorer backend REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, trace, Instrument};
use url::Url;

use crate::error::{Result, SnowprintError};
use crate::protocol::{
    BaseResponse, Block, CrossChainTx, NetworkStats, ProposalsResponse, Transaction,
};
use crate::spans;
use crate::traits::ExplorerApi;

/// Default backend location when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Per-request timeout applied by [`BackendApiClient`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Production [`ExplorerApi`] talking to the explorer backend over HTTP.
///
/// # Examples
///
/// ```rust,no_run
/// use snowprint::providers::BackendApiClient;
/// use snowprint::ExplorerApi;
///
/// # async fn example() -> Result<(), snowprint::SnowprintError> {
/// let api = BackendApiClient::new("http://localhost:3001")?;
/// let stats = api.network_stats().await?;
/// println!("block {}", stats.block_number);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BackendApiClient {
    base_url: Url,
    client: Client,
}

impl BackendApiClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// Endpoints resolve below the full base path, so a backend mounted at
    /// `https://host/api` serves network stats from `https://host/api/stats/network`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url.as_ref()).map_err(|e| SnowprintError::InvalidUrl {
                reason: format!("Invalid API URL: {e}"),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(SnowprintError::InvalidUrl {
                reason: format!("API URL {base_url} cannot have endpoint paths"),
            });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Creates a client for a backend running on the default local port.
    pub fn local() -> Result<Self> {
        Self::new(DEFAULT_API_URL)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SnowprintError::InvalidUrl {
                reason: format!("Failed to construct endpoint URL: {e}"),
            })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let span = spans::http_request("GET", &url);

        async {
            trace!(url = %url, "Requesting backend endpoint");
            let response = self.client.get(url.clone()).send().await?;

            let status_code = response.status();
            tracing::Span::current().record("http.status_code", status_code.as_u16());

            if let Err(e) = response.error_for_status_ref() {
                spans::record_error(&e);
                error!(
                    url = %url,
                    status_code = %status_code,
                    event = "backend_request_failed"
                );
                return Err(SnowprintError::Network(e));
            }

            let body = response.json::<T>().await?;
            debug!(url = %url, event = "backend_response_parsed");
            Ok(body)
        }
        .instrument(span)
        .await
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let envelope: BaseResponse<T> = self.get(path).await?;
        match envelope.error {
            Some(message) => {
                error!(path = path, error = %message, event = "backend_reported_error");
                Err(SnowprintError::Api(message))
            }
            None => Ok(envelope.data),
        }
    }
}

#[async_trait]
impl ExplorerApi for BackendApiClient {
    #[instrument(skip(self))]
    async fn test_connection(&self) -> Result<serde_json::Value> {
        self.get("test").await
    }

    #[instrument(skip(self))]
    async fn network_stats(&self) -> Result<NetworkStats> {
        self.get_data("stats/network").await
    }

    #[instrument(skip(self))]
    async fn latest_block(&self) -> Result<Block> {
        self.get_data("stats/blocks/latest").await
    }

    #[instrument(skip(self))]
    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.get_data("stats/transactions").await
    }

    #[instrument(skip(self))]
    async fn cross_chain_transactions(&self) -> Result<Vec<CrossChainTx>> {
        self.get_data("stats/cross-chain").await
    }

    #[instrument(skip(self))]
    async fn proposals(&self) -> Result<ProposalsResponse> {
        self.get("community/proposals").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_endpoint_urls() {
        let client = BackendApiClient::new("https://api.example.org").unwrap();
        assert_eq!(
            client.endpoint("stats/blocks/latest").unwrap().as_str(),
            "https://api.example.org/stats/blocks/latest"
        );
        insta::assert_snapshot!(
            client.endpoint("community/proposals").unwrap(),
            @"https://api.example.org/community/proposals"
        );
    }

    #[rstest]
    #[case("https://host.example/api")]
    #[case("https://host.example/api/")]
    fn test_base_path_is_kept(#[case] base: &str) {
        let client = BackendApiClient::new(base).unwrap();
        assert_eq!(client.base_url().as_str(), "https://host.example/api/");
        assert_eq!(
            client.endpoint("stats/network").unwrap().as_str(),
            "https://host.example/api/stats/network"
        );
        assert_eq!(
            client.endpoint("/stats/network").unwrap().as_str(),
            "https://host.example/api/stats/network"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = BackendApiClient::new("not a url");
        assert!(matches!(result, Err(SnowprintError::InvalidUrl { .. })));

        let result = BackendApiClient::new("mailto:ops@snowprint.dev");
        assert!(matches!(result, Err(SnowprintError::InvalidUrl { .. })));
    }

    #[test]
    fn test_local_default() {
        let client = BackendApiClient::local().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/");
    }
}

//! CoinCap market-data API client
//!
//! Fetches the asset list from the CoinCap `/assets` endpoint and parses it into
//! `AssetRecord`s. A single attempt is made per call; failures surface immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::AssetRecord;

/// Base URL for the CoinCap assets endpoint
pub const COINCAP_ASSETS_URL: &str = "https://api.coincap.io/v2/assets";

/// Errors that can occur when fetching asset data
#[derive(Debug, Error)]
pub enum FetchError {
    /// Provider answered with a non-success status
    #[error("Upstream returned HTTP {status}")]
    Upstream { status: u16 },

    /// Body was not JSON or did not contain an asset list
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    /// Transport failure (DNS, connect, reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// The message shown to users; error details stay in the logs
    pub fn user_message(&self) -> &'static str {
        "Couldn't get crypto data"
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Anything that can produce the full upstream asset list
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch_assets(&self, limit: u32) -> Result<Vec<AssetRecord>, FetchError>;
}

/// Response envelope from CoinCap
#[derive(Debug, Deserialize)]
struct AssetsResponse {
    data: Vec<AssetRecord>,
}

/// Client for fetching asset data from CoinCap
#[derive(Debug, Clone)]
pub struct CoinCapClient {
    client: Client,
    /// Endpoint URL (allows override for testing and mirrors)
    base_url: String,
}

impl Default for CoinCapClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinCapClient {
    /// Create a new CoinCapClient pointed at the public API
    pub fn new() -> Self {
        Self::with_base_url(COINCAP_ASSETS_URL)
    }

    /// Create a new CoinCapClient pointed at a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch up to `limit` assets
    ///
    /// # Returns
    /// * `Ok(Vec<AssetRecord>)` - Assets in provider order
    /// * `Err(FetchError)` - On a non-success status, a malformed body, or a transport failure
    pub async fn fetch(&self, limit: u32) -> Result<Vec<AssetRecord>, FetchError> {
        log::debug!("Fetching {} assets from {}", limit, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        parse_assets(&text)
    }
}

#[async_trait]
impl AssetSource for CoinCapClient {
    async fn fetch_assets(&self, limit: u32) -> Result<Vec<AssetRecord>, FetchError> {
        self.fetch(limit).await
    }
}

/// Parse a CoinCap response body into asset records
pub fn parse_assets(body: &str) -> Result<Vec<AssetRecord>, FetchError> {
    let response: AssetsResponse = serde_json::from_str(body)?;
    Ok(response.data)
}

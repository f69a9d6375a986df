//! HTTP client for the Guild Wars 2 v2 API.
//!
//! Three read-only endpoints are consumed: the full skin id list, the
//! batch-details endpoint (comma-joined ids plus a language code), and the
//! authenticated account-unlocks endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::models::RawSkin;

use super::ApiError;

/// Base URL for the public API
const API_BASE_URL: &str = "https://api.guildwars2.com/v2";

/// HTTP request timeout in seconds.
/// 30s allows for slow bulk-details responses while still bounding a stalled
/// batch.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote API surface the sync engine and overlay fetcher are written
/// against. Implemented by `CatalogClient` for production and by in-memory
/// fakes in tests.
#[async_trait]
pub trait SkinApi: Send + Sync {
    /// Fetch the full list of catalog skin ids.
    async fn list_skin_ids(&self) -> Result<Vec<u64>, ApiError>;

    /// Fetch detail records for a batch of ids. The caller performs
    /// chunking; a call either returns the whole batch or fails entirely.
    async fn fetch_skin_details(&self, ids: &[u64]) -> Result<Vec<RawSkin>, ApiError>;

    /// Fetch the ids the account has unlocked. A rejected credential
    /// surfaces as an auth-classified `ApiError`; anything else as a
    /// network/server classification.
    async fn fetch_account_unlocks(&self, api_key: &str) -> Result<Vec<u64>, ApiError>;
}

// Lets one client be shared between the sync engine and the overlay fetcher
#[async_trait]
impl<T: SkinApi + ?Sized> SkinApi for std::sync::Arc<T> {
    async fn list_skin_ids(&self) -> Result<Vec<u64>, ApiError> {
        (**self).list_skin_ids().await
    }

    async fn fetch_skin_details(&self, ids: &[u64]) -> Result<Vec<RawSkin>, ApiError> {
        (**self).fetch_skin_details(ids).await
    }

    async fn fetch_account_unlocks(&self, api_key: &str) -> Result<Vec<u64>, ApiError> {
        (**self).fetch_account_unlocks(api_key).await
    }
}

/// API client for the skin catalog.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl CatalogClient {
    /// Create a new client requesting detail records in the given language.
    pub fn new(lang: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            lang: lang.into(),
        })
    }

    /// Override the API base URL (local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check if a response is successful, classifying the status and body
    /// into a structured error if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    fn join_ids(ids: &[u64]) -> String {
        ids.iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl SkinApi for CatalogClient {
    async fn list_skin_ids(&self) -> Result<Vec<u64>, ApiError> {
        let url = format!("{}/skins", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let ids: Vec<u64> = response.json().await?;
        debug!(count = ids.len(), "Fetched skin id list");
        Ok(ids)
    }

    async fn fetch_skin_details(&self, ids: &[u64]) -> Result<Vec<RawSkin>, ApiError> {
        let url = format!(
            "{}/skins?ids={}&lang={}",
            self.base_url,
            Self::join_ids(ids),
            self.lang
        );
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let skins: Vec<RawSkin> = response.json().await?;
        debug!(requested = ids.len(), returned = skins.len(), "Fetched skin details");
        Ok(skins)
    }

    async fn fetch_account_unlocks(&self, api_key: &str) -> Result<Vec<u64>, ApiError> {
        // Query parameter instead of Authorization header to match the
        // endpoint's token handling
        let url = format!("{}/account/skins?access_token={}", self.base_url, api_key);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let ids: Vec<u64> = response.json().await?;
        debug!(count = ids.len(), "Fetched account unlocks");
        Ok(ids)
    }
}

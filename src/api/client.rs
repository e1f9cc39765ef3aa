use futures::Stream;
use futures::TryStreamExt;
use reqwest::Client;
use thiserror::Error;

use super::models::{
    detail_text, ApiConfig, ErrorResponse, HealthResponse, YoinkRequest, YoinkResponse,
};

pub const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Shown when the backend rejects a yoink without saying why.
pub const YOINK_FAILED: &str = "Failed to yoink.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Rejection reported by the backend, displayed verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Download URL not found")]
    NoDownloadUrl,
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Ask the backend to fetch and stage `url`.
    pub async fn yoink(&self, url: &str, access_key: &str) -> Result<YoinkResponse> {
        let endpoint = format!("{}/yoink", self.base_url());
        tracing::debug!(%endpoint, "sending yoink request");

        let response = self
            .http
            .post(&endpoint)
            .header(ACCESS_KEY_HEADER, access_key)
            .json(&YoinkRequest { url })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            tracing::info!(status = status.as_u16(), "yoink rejected by backend");
            return Err(ApiError::Rejected(
                detail_text(error.detail.as_ref()).unwrap_or_else(|| YOINK_FAILED.to_string()),
            ));
        }

        let json: YoinkResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if !json.is_success() {
            return Err(ApiError::Rejected(
                detail_text(json.detail.as_ref()).unwrap_or_else(|| YOINK_FAILED.to_string()),
            ));
        }

        if json.download_url.is_empty() {
            return Err(ApiError::NoDownloadUrl);
        }

        Ok(json)
    }

    /// Full link to a staged file, carrying the access key as a query credential.
    pub fn download_link(&self, download_path: &str, access_key: &str) -> String {
        let token: String = url::form_urlencoded::byte_serialize(access_key.as_bytes()).collect();
        format!("{}{}?token={}", self.base_url(), download_path, token)
    }

    /// Queries the backend's /health endpoint
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url()))
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Download a staged file with progress stream
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_link: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self.http.get(download_link).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(ApiError::Rejected(
                detail_text(error.detail.as_ref())
                    .unwrap_or_else(|| format!("Download request failed: {}", status)),
            ));
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

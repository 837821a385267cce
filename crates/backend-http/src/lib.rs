//! Patent data service backend.
//!
//! Provides the `PatentService` trait, its HTTP implementation, the embedded
//! fallback dataset and the `PatentData` facade that ties them together:
//! every call goes to the service first and falls back to the embedded
//! records when the service cannot answer.

mod facade;
mod fallback;

pub use facade::{Fetched, LookupError, PatentData};
pub use fallback::FallbackDataset;

use patentmap_model::{PatentRecord, SearchCriteria};
use patentmap_query::{QueryDialect, ServiceDialect};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors from data service operations.
///
/// All of these are transport failures from the caller's point of view and
/// are recovered by the fallback dataset.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("Backend not available")]
    Unavailable,
}

/// Trait for patent data sources.
///
/// This abstraction keeps the facade and the view layer independent of the
/// transport, and lets tests substitute an in-memory service.
pub trait PatentService {
    /// Fetch every patent the service knows.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<PatentRecord>, BackendError>> + Send;

    /// Search with the service's own filtering.
    fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> impl Future<Output = Result<Vec<PatentRecord>, BackendError>> + Send;

    /// Look up a single patent by number.
    fn fetch_by_no(
        &self,
        patent_no: &str,
    ) -> impl Future<Output = Result<PatentRecord, BackendError>> + Send;

    /// Check if the service is reachable.
    fn health_check(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Get the service name for logging.
    fn name(&self) -> &'static str;
}

/// HTTP data service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the REST API, e.g. `http://localhost:3000/api`
    pub base_url: String,
    /// Request timeout in seconds; `None` leaves requests unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: None,
        }
    }
}

/// REST client for the patent data service.
pub struct HttpPatentService {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl HttpPatentService {
    /// Create a new HTTP service client.
    pub fn new(config: ServiceConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build an endpoint URL below the base, one path segment per item.
    ///
    /// Segments are percent-encoded, so a patent number such as
    /// "TR2023/990011" stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, BackendError> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", self.config.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))
    }
}

impl PatentService for HttpPatentService {
    async fn fetch_all(&self) -> Result<Vec<PatentRecord>, BackendError> {
        let url = self.endpoint(&["patents"])?;
        tracing::debug!(url = %url, "Fetching all patents");
        self.get_json(self.client.get(url)).await
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<PatentRecord>, BackendError> {
        let url = self.endpoint(&["patents", "search"])?;
        let params = ServiceDialect
            .translate(criteria)
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url = %url, params = ?params, "Searching patents");
        self.get_json(self.client.get(url).query(&params)).await
    }

    async fn fetch_by_no(&self, patent_no: &str) -> Result<PatentRecord, BackendError> {
        let url = self.endpoint(&["patents", "no", patent_no])?;
        tracing::debug!(url = %url, "Fetching patent");
        self.get_json(self.client.get(url)).await
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&["patents"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// Upstream airline API: query shape, fetch trait and the reqwest-backed client
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://private-anon-36f987f0b6-mockairline.apiary-mock.com/flights/";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Client error: {0}")]
    ClientError(String),
}

impl UpstreamError {
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::NetworkError(_) | UpstreamError::Timeout(_) => true,
            UpstreamError::ApiResponseError { is_retryable, .. } => *is_retryable,
            UpstreamError::InvalidQuery(_) | UpstreamError::ClientError(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_config: RetryConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 5000,
            retry_config: RetryConfig::default(),
        }
    }
}

// Path parameters of the availability search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub origin: String,
    pub destination: String,
    pub departure: String,
    pub return_date: String,
    pub passengers: u32,
}

impl AvailabilityQuery {
    pub fn validate(&self) -> Result<(), UpstreamError> {
        let segments = [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("departure", &self.departure),
            ("return date", &self.return_date),
        ];
        for (name, value) in segments {
            if value.trim().is_empty() {
                return Err(UpstreamError::InvalidQuery(format!("{} is empty", name)));
            }
            if value.contains('/') {
                return Err(UpstreamError::InvalidQuery(format!(
                    "{} contains a path separator: {:?}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Upstream resource path, relative to the configured base URL.
    pub fn upstream_path(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.origin, self.destination, self.departure, self.return_date, self.passengers
        )
    }

    pub fn upstream_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.upstream_path())
    }

    // Route this service answers the query on
    pub fn route(&self) -> String {
        format!(
            "/flights/origin/{}/destination/{}/departure/{}/return/{}/passengers/{}",
            self.origin, self.destination, self.departure, self.return_date, self.passengers
        )
    }
}

// Source of raw availability documents
#[async_trait]
pub trait AvailabilitySource: Send + Sync + 'static {
    async fn fetch(&self, query: &AvailabilityQuery) -> Result<Bytes, UpstreamError>;
}

pub struct HttpAvailabilitySource {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpAvailabilitySource {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| UpstreamError::ClientError(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> Result<Bytes, UpstreamError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/xml")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::ApiResponseError {
                status_code: status.as_u16(),
                message,
                is_retryable: status.is_server_error() || status.as_u16() == 429,
            });
        }

        response.bytes().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.config.timeout_ms)
        } else {
            UpstreamError::NetworkError(error.to_string())
        }
    }
}

#[async_trait]
impl AvailabilitySource for HttpAvailabilitySource {
    async fn fetch(&self, query: &AvailabilityQuery) -> Result<Bytes, UpstreamError> {
        query.validate()?;
        let url = query.upstream_url(&self.config.base_url);
        let retry = &self.config.retry_config;

        let mut attempt = 0;
        loop {
            debug!(%url, attempt, "fetching availability");
            match self.fetch_once(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    let backoff = calculate_backoff(attempt, retry);
                    warn!(error = %e, attempt, backoff_ms = backoff.as_millis() as u64, "retrying availability fetch");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// Exponential backoff with jitter
pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
    let base_backoff_ms = (config.initial_backoff_ms as f64
        * config.backoff_multiplier.powf(retry_attempt as f64))
    .min(config.max_backoff_ms as f64);

    let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
    let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

    Duration::from_millis(backoff_ms as u64)
}

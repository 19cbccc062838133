//! HTTP client for the journeys query API
//!
//! The backend runs the actual session query; this client only asks for a
//! website's journeys and parses the `{ "journeys": [...] }` response.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{Journey, JourneysResponse};

/// Upper bound on the path depth the backend accepts.
pub const MAX_STEPS: u32 = 20;

/// Parameters of a journeys request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyQuery {
    /// Website to query
    pub website_id: String,
    /// First day included (backend default when unset)
    pub start_date: Option<NaiveDate>,
    /// Last day included (backend default when unset)
    pub end_date: Option<NaiveDate>,
    /// Only journeys starting at this URL path
    pub url_path: Option<String>,
    /// Path depth
    pub steps: u32,
    /// Maximum number of journeys returned
    pub limit: u32,
}

impl JourneyQuery {
    pub fn new(website_id: impl Into<String>, steps: u32, limit: u32) -> Self {
        Self {
            website_id: website_id.into(),
            start_date: None,
            end_date: None,
            url_path: None,
            steps,
            limit,
        }
    }

    /// Reject queries the backend would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.website_id.trim().is_empty() {
            return Err(Error::InvalidQuery("website id is empty".to_string()));
        }
        if self.steps == 0 || self.steps > MAX_STEPS {
            return Err(Error::InvalidQuery(format!(
                "steps must be between 1 and {}, got {}",
                MAX_STEPS, self.steps
            )));
        }
        if self.limit == 0 {
            return Err(Error::InvalidQuery("limit must be greater than 0".to_string()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::InvalidQuery(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut params = vec![
            ("websiteId", self.website_id.clone()),
            ("steps", self.steps.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(start) = self.start_date {
            params.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(url_path) = &self.url_path {
            params.push(("urlPath", url_path.clone()));
        }

        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// HTTP client for the journeys query API
pub struct QueryClient {
    config: ApiConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl QueryClient {
    /// Create a new query client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing required fields.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| Error::Config("api.base_url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    /// Full URL for a journeys request.
    pub fn journeys_url(&self, query: &JourneyQuery) -> String {
        format!("{}/journeys?{}", self.base_url, query.to_query_string())
    }

    /// Fetch journeys once, without retrying.
    pub async fn fetch_journeys_once(&self, query: &JourneyQuery) -> Result<Vec<Journey>> {
        query.validate()?;
        let url = self.journeys_url(query);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Api(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            let result: JourneysResponse = response
                .json()
                .await
                .map_err(|e| Error::Api(format!("failed to parse response: {}", e)))?;
            Ok(result.journeys)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Api(format!("API error ({}): {}", status, error_text)))
        }
    }

    /// Fetch journeys with retry logic
    ///
    /// Retries transient failures (5xx, timeouts) with exponential backoff.
    pub async fn fetch_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>> {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "Retrying fetch_journeys (attempt {}/{}), waiting {:?}",
                    attempt + 1,
                    self.config.max_retries + 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_secs(30));
            }

            match self.fetch_journeys_once(query).await {
                Ok(journeys) => {
                    tracing::info!(
                        website_id = %query.website_id,
                        journeys = journeys.len(),
                        "Fetched journeys"
                    );
                    return Ok(journeys);
                }
                Err(e) if is_retryable_error(&e) => {
                    tracing::warn!("Transient error fetching journeys: {}", e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Api("max retries exceeded".to_string())))
    }
}

/// Synchronous wrapper for QueryClient
///
/// Provides blocking methods for use in synchronous code.
pub struct SyncQueryClient {
    inner: QueryClient,
    runtime: tokio::runtime::Runtime,
}

impl SyncQueryClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Api(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            inner: QueryClient::new(config)?,
            runtime,
        })
    }

    /// Fetch journeys with retries (blocking)
    pub fn fetch_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>> {
        self.runtime.block_on(self.inner.fetch_journeys(query))
    }

    pub fn journeys_url(&self, query: &JourneyQuery) -> String {
        self.inner.journeys_url(query)
    }
}

/// Check if an error is retryable (transient)
fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Api(msg) => {
            // Retry on 5xx errors
            msg.contains("API error (5")
                // Retry on network/timeout errors
                || msg.contains("timeout")
                || msg.contains("connection")
                || msg.contains("request failed")
        }
        _ => false,
    }
}

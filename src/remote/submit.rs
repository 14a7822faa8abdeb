//! URL submission endpoint client
//!
//! Validates candidate URLs locally and submits them to the gateway's
//! `/analyze/` endpoint for ingestion.

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use super::{call, ApiConfig, Endpoint, FetchError};

/// Message attached to a successful submission
const SUBMITTED_MESSAGE: &str = "URL submitted successfully";

/// Checks that `candidate` parses as an absolute URL.
///
/// This is a syntax check only. Nothing is resolved or fetched.
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

/// Why user input was refused before any submission
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UrlInputError {
    /// Nothing but whitespace was entered
    #[error("URL is required")]
    Missing,

    /// The input does not parse as a URL
    #[error("Please enter a valid URL (e.g., https://example.com)")]
    Malformed,
}

/// Validates raw user input ahead of a submission
pub fn validate_url_input(input: &str) -> Result<(), UrlInputError> {
    if input.trim().is_empty() {
        return Err(UrlInputError::Missing);
    }
    if !is_valid_url(input) {
        return Err(UrlInputError::Malformed);
    }
    Ok(())
}

/// Caller-facing result of a URL submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Whether the gateway accepted the URL
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Payload returned by the gateway, present on success only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Submission {
    /// A submission the gateway accepted
    pub fn accepted(data: Value) -> Self {
        Self {
            success: true,
            message: SUBMITTED_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    /// A submission that failed with the given classified error
    pub fn rejected(err: &FetchError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            data: None,
        }
    }
}

/// Client for the gateway's URL analysis endpoint
#[derive(Debug, Clone)]
pub struct UrlSubmitter {
    http_client: Client,
    config: ApiConfig,
}

impl Default for UrlSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlSubmitter {
    /// Creates a submitter for the default gateway
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Creates a submitter for the given gateway
    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Creates a submitter sharing an existing HTTP client
    pub fn with_client(http_client: Client, config: ApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Submits a URL for analysis
    ///
    /// The body is `{"url": url}` with no wrapper object; the `/analyze/`
    /// endpoint does not share the `/ask/` envelope.
    ///
    /// # Returns
    /// * `Ok(Submission)` - Accepted, with the gateway's payload as `data`
    /// * `Err(FetchError)` - The classified failure
    pub async fn submit_url(&self, url: &str) -> Result<Submission, FetchError> {
        let body = json!({ "url": url });
        let data = call(&self.http_client, &self.config, Endpoint::Analyze, &body).await?;
        Ok(Submission::accepted(data))
    }
}

//! Remote gateway clients
//!
//! Both gateway endpoints share one request shape (JSON POST, JSON response)
//! and one failure taxonomy. This module holds that shared plumbing: endpoint
//! configuration, the typed transport failures reported by the HTTP layer, and
//! the classification of those failures into the four caller-facing kinds.

pub mod answer;
pub mod submit;

pub use answer::AnswerClient;
pub use submit::{is_valid_url, validate_url_input, Submission, UrlInputError, UrlSubmitter};

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Gateway address used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://localhost:8080";

/// The gateway endpoints this crate talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Question answering (`POST /ask/`)
    Ask,
    /// URL submission for analysis (`POST /analyze/`)
    Analyze,
}

impl Endpoint {
    /// Path of the endpoint relative to the gateway base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Ask => "/ask/",
            Endpoint::Analyze => "/analyze/",
        }
    }

    /// Message surfaced when a failure matches no specific category
    pub fn generic_failure_message(self) -> &'static str {
        match self {
            Endpoint::Ask => "Failed to get response from API. Please try again.",
            Endpoint::Analyze => "Failed to submit URL. Please try again.",
        }
    }
}

/// Where the gateway lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme and authority of the gateway, e.g. `https://localhost:8080`
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a config pointing at the given gateway
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Full URL of an endpoint on this gateway
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }
}

/// What went wrong underneath a remote call, as reported by the HTTP layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The request never produced a usable response (DNS, refused connection, TLS, reset)
    #[error("request failed: {0}")]
    Connect(String),

    /// The gateway answered with a non-success status code
    #[error("API request failed: {0}")]
    Status(u16),

    /// The response body was not valid JSON
    #[error("invalid JSON response: {0}")]
    InvalidBody(String),

    /// The response decoded to an empty value
    #[error("Invalid response format from API")]
    EmptyBody,
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportFailure::InvalidBody(err.to_string())
        } else {
            TransportFailure::Connect(err.to_string())
        }
    }
}

/// Classified failure of a remote call, as shown to the caller
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// The gateway could not be reached
    #[error("Network error. Please check your internet connection.")]
    Network,

    /// The gateway answered 404
    #[error("API endpoint not found. Please check the API URL.")]
    NotFound,

    /// The gateway answered 500
    #[error("Server error. Please try again later.")]
    Server,

    /// Any other failure: other statuses, malformed or empty bodies
    #[error("{}", .0.generic_failure_message())]
    Generic(Endpoint),
}

impl FetchError {
    /// Stable machine-readable tag for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network => "network",
            FetchError::NotFound => "not_found",
            FetchError::Server => "server",
            FetchError::Generic(_) => "generic",
        }
    }
}

/// Maps a transport failure onto the caller-facing taxonomy.
///
/// The checks run in a fixed order: connectivity, then 404, then 500, then the
/// generic fallback. The first match wins.
pub fn classify(failure: &TransportFailure, endpoint: Endpoint) -> FetchError {
    match failure {
        TransportFailure::Connect(_) => FetchError::Network,
        TransportFailure::Status(404) => FetchError::NotFound,
        TransportFailure::Status(500) => FetchError::Server,
        _ => FetchError::Generic(endpoint),
    }
}

/// Returns true for decoded bodies the gateway contract treats as "no answer"
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Sends `body` as JSON to `url` and decodes the JSON response
async fn post_json(client: &Client, url: &str, body: &Value) -> Result<Value, TransportFailure> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportFailure::Status(status.as_u16()));
    }

    let text = response.text().await?;
    let payload: Value = serde_json::from_str(&text)
        .map_err(|e| TransportFailure::InvalidBody(e.to_string()))?;

    if is_empty_payload(&payload) {
        return Err(TransportFailure::EmptyBody);
    }

    Ok(payload)
}

/// Performs one remote call and classifies any failure.
///
/// The raw failure is logged before the classified error is returned.
pub(crate) async fn call(
    client: &Client,
    config: &ApiConfig,
    endpoint: Endpoint,
    body: &Value,
) -> Result<Value, FetchError> {
    let url = config.endpoint_url(endpoint);
    debug!(url = %url, "sending gateway request");

    match post_json(client, &url, body).await {
        Ok(payload) => Ok(payload),
        Err(failure) => {
            warn!(endpoint = endpoint.path(), error = %failure, "gateway request failed");
            Err(classify(&failure, endpoint))
        }
    }
}

/// Reserves a local port with nothing listening on it
#[cfg(test)]
pub(crate) fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

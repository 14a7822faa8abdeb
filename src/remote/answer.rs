//! Question-answering endpoint client
//!
//! Sends a question to the gateway's `/ask/` endpoint and returns the decoded
//! answer payload untouched.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{call, ApiConfig, Endpoint, FetchError};
use crate::cache::AnswerSource;

/// Client for the gateway's question-answering endpoint
#[derive(Debug, Clone)]
pub struct AnswerClient {
    http_client: Client,
    config: ApiConfig,
}

impl Default for AnswerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerClient {
    /// Creates a client for the default gateway
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Creates a client for the given gateway
    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Creates a client sharing an existing HTTP client
    pub fn with_client(http_client: Client, config: ApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Asks the gateway a question
    ///
    /// The question is sent exactly as given, wrapped as
    /// `{"body": {"user-input": question}}`.
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded JSON answer, whatever its shape
    /// * `Err(FetchError)` - The classified failure
    pub async fn ask(&self, question: &str) -> Result<Value, FetchError> {
        let body = json!({ "body": { "user-input": question } });
        call(&self.http_client, &self.config, Endpoint::Ask, &body).await
    }
}

#[async_trait]
impl AnswerSource for AnswerClient {
    type Answer = Value;

    async fn fetch(&self, question: &str) -> Result<Value, FetchError> {
        self.ask(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::unreachable_base_url;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnswerClient {
        AnswerClient::with_config(ApiConfig::new(server.uri()))
    }

    #[tokio::test]
    async fn test_ask_posts_wrapped_question() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "body": { "user-input": "  What is Rust?  " } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("A language")))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).ask("  What is Rust?  ").await;

        assert_eq!(answer, Ok(json!("A language")));
    }

    #[tokio::test]
    async fn test_ask_returns_structured_payload_verbatim() {
        let server = MockServer::start().await;
        let payload = json!({ "answer": "Paris", "sources": [1, 2], "score": 0.9 });
        Mock::given(method("POST"))
            .and(path("/ask/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        let answer = client_for(&server).ask("capital?").await;

        assert_eq!(answer, Ok(payload));
    }

    #[tokio::test]
    async fn test_ask_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::NotFound);
        assert_eq!(err.to_string(), "API endpoint not found. Please check the API URL.");
    }

    #[tokio::test]
    async fn test_ask_500_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::Server);
    }

    #[tokio::test]
    async fn test_ask_503_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::Generic(Endpoint::Ask));
        assert_eq!(
            err.to_string(),
            "Failed to get response from API. Please try again."
        );
    }

    #[tokio::test]
    async fn test_ask_null_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::Generic(Endpoint::Ask));
    }

    #[tokio::test]
    async fn test_ask_malformed_json_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::Generic(Endpoint::Ask));
    }

    #[tokio::test]
    async fn test_ask_unreachable_gateway_is_network_error() {
        let client = AnswerClient::with_config(ApiConfig::new(unreachable_base_url()));

        let err = client.ask("q").await.unwrap_err();

        assert_eq!(err, FetchError::Network);
        assert_eq!(
            err.to_string(),
            "Network error. Please check your internet connection."
        );
    }

    #[tokio::test]
    async fn test_fetch_delegates_to_ask() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["a", "b"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let answer = AnswerSource::fetch(&client, "list?").await;

        assert_eq!(answer, Ok(json!(["a", "b"])));
    }
}

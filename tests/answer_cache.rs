//! Integration tests for the answer cache against a mock gateway

use askcache::cache::{normalize, AnswerCache};
use askcache::remote::{AnswerClient, ApiConfig, FetchError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cache_for(server: &MockServer) -> AnswerCache<AnswerClient> {
    AnswerCache::new(AnswerClient::with_config(ApiConfig::new(server.uri())))
}

#[tokio::test]
async fn test_capital_of_france_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .and(body_json(json!({ "body": { "user-input": "What is the capital of France?" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Paris")))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    let first = cache.get_answer("What is the capital of France?").await.unwrap();
    let second = cache.get_answer("  WHAT IS THE CAPITAL OF FRANCE?").await.unwrap();

    assert_eq!(first.answer, json!("Paris"));
    assert!(!first.from_cache);
    assert_eq!(second.answer, json!("Paris"));
    assert!(second.from_cache);

    let stats = cache.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.keys, vec![normalize("What is the capital of France?")]);
}

#[tokio::test]
async fn test_failure_leaves_cache_empty_and_next_call_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    let err = cache.get_answer("meaning of life").await.unwrap_err();
    assert_eq!(err, FetchError::Server);
    assert_eq!(cache.stats().size, 0);

    let outcome = cache.get_answer("meaning of life").await.unwrap();
    assert!(!outcome.from_cache);
    assert_eq!(outcome.answer, json!({ "answer": 42 }));
    assert_eq!(cache.stats().size, 1);
}

#[tokio::test]
async fn test_clear_cache_makes_next_call_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("yes")))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    cache.get_answer("is it cached?").await.unwrap();
    cache.clear_cache();
    assert_eq!(cache.stats().size, 0);

    let outcome = cache.get_answer("is it cached?").await.unwrap();
    assert!(!outcome.from_cache);
}

#[tokio::test]
async fn test_concurrent_misses_each_reach_the_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!("slow answer"))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    let outcomes = futures::future::join_all([
        cache.get_answer("Same question"),
        cache.get_answer("same question"),
        cache.get_answer("  SAME QUESTION  "),
    ])
    .await;

    for outcome in outcomes {
        assert!(!outcome.unwrap().from_cache);
    }
    assert_eq!(cache.stats().size, 1);
    assert!(cache.get_answer("same question").await.unwrap().from_cache);
}

#[tokio::test]
async fn test_cache_instances_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("answer")))
        .expect(2)
        .mount(&server)
        .await;

    let first = cache_for(&server);
    let second = cache_for(&server);

    first.get_answer("shared?").await.unwrap();
    let outcome = second.get_answer("shared?").await.unwrap();

    assert!(!outcome.from_cache);
    assert_eq!(first.stats().size, 1);
    assert_eq!(second.stats().size, 1);
}

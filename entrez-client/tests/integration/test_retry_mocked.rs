//! Mocked tests for the retry behavior of the request path.

use std::time::Duration;

use entrez_client::{ClientConfig, EntrezClient, EntrezError, RetryConfig};
use tracing_test::traced_test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(base_url: &str) -> EntrezClient {
    // Short waits keep the real-time retries fast.
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_retry_config(RetryConfig {
            max_attempts: 3,
            initial_wait: Duration::from_millis(10),
        });
    EntrezClient::with_config(config)
}

#[tokio::test]
#[traced_test]
async fn test_recovers_after_server_errors() {
    let mock_server = MockServer::start().await;

    // First two attempts fail with 500, the third succeeds.
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<eSearchResult><Count>42</Count></eSearchResult>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let count = client.get_count("asthma").await.unwrap();
    assert_eq!(count, 42);
}

#[tokio::test]
#[traced_test]
async fn test_exhausted_attempts_propagate_final_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let result = client.get_count("asthma").await;
    match result {
        Err(EntrezError::ApiError { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected ApiError, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
#[traced_test]
async fn test_client_errors_are_also_retried() {
    // The policy retries any non-2xx status, not just server errors.
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let result = client.get_count("asthma").await;
    assert!(matches!(
        result,
        Err(EntrezError::ApiError { status: 404, .. })
    ));
}

#[tokio::test]
#[traced_test]
async fn test_success_is_never_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<eSearchResult><Count>7</Count></eSearchResult>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    assert_eq!(client.get_count("asthma").await.unwrap(), 7);
}

/// Integration tests for the Chronos upstream client against a mock server
use chronos_exporter::{
    config::TargetConfig,
    error::AppError,
    providers::{ChronosClient, Upstream},
};
use httpmock::prelude::*;
use std::time::Duration;
use url::Url;

// The mock server speaks both plain HTTP and TLS on one port.
fn http_url(server: &MockServer, path: &str) -> String {
    format!("http://{}{}", server.address(), path)
}

fn create_test_target(base_url: &str) -> TargetConfig {
    TargetConfig {
        uri: Url::parse(base_url).unwrap(),
        timeout: Duration::from_secs(2),
        verify_tls: true,
        auth_bearer_token: None,
    }
}

#[tokio::test]
async fn test_probe_succeeds_on_200() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).body("pong");
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    assert!(client.probe().await.is_ok());
    ping.assert_async().await;
}

#[tokio::test]
async fn test_probe_fails_on_non_200() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(503);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    let result = client.probe().await;

    match result {
        Err(AppError::UnexpectedStatus { status, url }) => {
            assert_eq!(status.as_u16(), 503);
            assert!(url.ends_with("/ping"));
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_probe_fails_on_204() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(204);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    assert!(client.probe().await.is_err());
}

#[tokio::test]
async fn test_probe_fails_on_transport_error() {
    // Nothing listens on port 1
    let client = ChronosClient::new(create_test_target("http://127.0.0.1:1"));
    let result = client.probe().await;
    assert!(matches!(result, Err(AppError::HttpRequest(_))));
}

#[tokio::test]
async fn test_fetch_returns_exact_body() {
    let body = "{\"gauges\": {\"jvm.memory.heap.used\": {\"value\": 1}}}\n  ";
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics");
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    let bytes = client.fetch().await.unwrap();
    assert_eq!(&bytes[..], body.as_bytes());
}

#[tokio::test]
async fn test_fetch_fails_on_non_200() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics");
            then.status(500).body("{\"error\": \"boom\"}");
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    assert!(matches!(
        client.fetch().await,
        Err(AppError::UnexpectedStatus { .. })
    ));
}

#[tokio::test]
async fn test_fetch_fails_on_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics");
            then.status(200).body("{}").delay(Duration::from_millis(800));
        })
        .await;

    let mut target = create_test_target(&http_url(&server, ""));
    target.timeout = Duration::from_millis(100);
    let client = ChronosClient::new(target);

    match client.fetch().await {
        Err(AppError::HttpRequest(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bearer_token_sent_on_every_request() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ping")
                .header("authorization", "Bearer s3cret");
            then.status(200);
        })
        .await;
    let metrics = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/metrics")
                .header("authorization", "Bearer s3cret");
            then.status(200).body("{}");
        })
        .await;

    let mut target = create_test_target(&http_url(&server, ""));
    target.auth_bearer_token = Some("s3cret".to_string());
    let client = ChronosClient::new(target);

    client.probe().await.unwrap();
    client.fetch().await.unwrap();

    ping.assert_async().await;
    metrics.assert_async().await;
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping").header_missing("authorization");
            then.status(200);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "")));
    client.probe().await.unwrap();
    ping.assert_async().await;
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/chronos/ping");
            then.status(200);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&http_url(&server, "/chronos/")));
    client.probe().await.unwrap();
    ping.assert_async().await;
}

#[tokio::test]
async fn test_self_signed_certificate_rejected_when_verifying() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(200);
        })
        .await;

    let client = ChronosClient::new(create_test_target(&server.url("")));
    assert!(matches!(client.probe().await, Err(AppError::HttpRequest(_))));
    ping.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_self_signed_certificate_accepted_without_verification() {
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping");
            then.status(200);
        })
        .await;
    let metrics = server
        .mock_async(|when, then| {
            when.method(GET).path("/metrics");
            then.status(200).body("{}");
        })
        .await;

    let mut target = create_test_target(&server.url(""));
    target.verify_tls = false;
    assert_eq!(target.uri.scheme(), "https");
    let client = ChronosClient::new(target);

    client.probe().await.unwrap();
    assert_eq!(&client.fetch().await.unwrap()[..], b"{}");

    ping.assert_async().await;
    metrics.assert_async().await;
}

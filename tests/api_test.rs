// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Check API Tests
 * Error envelopes and end-to-end check responses over HTTP
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use tutka_scanner::api::{create_router, ApiState};
use tutka_scanner::config::AppConfig;
use tutka_scanner::dns::DnsClient;
use tutka_scanner::http_client::HttpClient;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Spawn the API on an ephemeral port and return its base URL.
async fn spawn_api() -> String {
    let state = Arc::new(ApiState {
        client: Arc::new(HttpClient::new(10).unwrap()),
        dns: Arc::new(DnsClient::new().unwrap()),
        config: AppConfig::default(),
    });

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_missing_url_parameter_is_bad_request() {
    let api = spawn_api().await;

    let response = reqwest::get(format!("{}/api/checks/secrets", api))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 400);
    assert!(body["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn test_malformed_url_is_bad_request() {
    let api = spawn_api().await;

    let response = reqwest::get(format!(
        "{}/api/checks/exposed-files?url=ftp%3A%2F%2Fsite.example",
        api
    ))
    .await
    .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_exposed_files_check_over_http() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.env"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("DB_HOST=localhost\nDB_PASS=secret"),
        )
        .mount(&target)
        .await;

    let api = spawn_api().await;

    let response = reqwest::get(format!(
        "{}/api/checks/exposed-files?url={}/",
        api,
        target.uri()
    ))
    .await
    .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["score"], 60);
    assert_eq!(body["exposedFiles"][0]["file"], ".env");
    assert_eq!(body["exposedFiles"][0]["severity"], "Critical");
    assert_eq!(body["exposedFiles"][0]["type"], "Config/System");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_secrets_check_envelope_over_http() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>clean</body></html>"))
        .mount(&target)
        .await;

    let api = spawn_api().await;

    let response = reqwest::get(format!("{}/api/checks/secrets?url={}/", api, target.uri()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["totalFindings"], 0);
    assert_eq!(body["scannedFilesCount"], 1);
    assert!(body["findings"].as_array().unwrap().is_empty());
    assert!(body["url"].as_str().unwrap().starts_with("http://"));
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Fetch Orchestrator Tests
 * Batch semantics, input-order results, typed outcomes, cancellation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use std::time::Duration;
use tutka_scanner::http_client::{FetchOutcome, HttpClient};
use tutka_scanner::orchestrator::{FetchJob, FetchOrchestrator, ScanCancellation};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn job(url: String) -> FetchJob {
    FetchJob::derived(url, 5, 1024 * 1024)
}

#[tokio::test]
async fn test_results_preserve_input_order() {
    let mock_server = MockServer::start().await;

    for route in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(route))
            .mount(&mock_server)
            .await;
    }

    let client = Arc::new(HttpClient::new(10).unwrap());
    let orchestrator = FetchOrchestrator::new(client, 2);

    let jobs = vec![
        job(format!("{}/a", mock_server.uri())),
        job(format!("{}/b", mock_server.uri())),
        job(format!("{}/c", mock_server.uri())),
    ];

    let results = orchestrator
        .fetch_all(jobs, &ScanCancellation::new())
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].job.url.ends_with("/a"));
    assert!(results[1].job.url.ends_with("/b"));
    assert!(results[2].job.url.ends_with("/c"));
    assert_eq!(results[0].outcome.response().unwrap().body, "/a");
    assert_eq!(results[2].outcome.response().unwrap().body, "/c");
}

#[tokio::test]
async fn test_http_status_is_not_auto_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let client = Arc::new(HttpClient::new(10).unwrap());
    let orchestrator = FetchOrchestrator::new(client, 5);

    let result = orchestrator
        .fetch_one(
            job(format!("{}/missing", mock_server.uri())),
            &ScanCancellation::new(),
        )
        .await;

    // A 404 is a successful fetch; interpretation belongs to the caller
    let response = result.outcome.response().expect("status is data");
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn test_slow_response_times_out_without_failing_others() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = Arc::new(HttpClient::new(30).unwrap());
    let orchestrator = FetchOrchestrator::new(client, 5);

    let jobs = vec![
        FetchJob::derived(format!("{}/slow", mock_server.uri()), 1, 1024),
        FetchJob::derived(format!("{}/fast", mock_server.uri()), 5, 1024),
    ];

    let results = orchestrator
        .fetch_all(jobs, &ScanCancellation::new())
        .await;

    assert!(matches!(results[0].outcome, FetchOutcome::Timeout));
    assert_eq!(results[1].outcome.response().unwrap().body, "ok");
}

#[tokio::test]
async fn test_invalid_url_yields_typed_outcome() {
    let client = Arc::new(HttpClient::new(10).unwrap());
    let orchestrator = FetchOrchestrator::new(client, 5);

    let result = orchestrator
        .fetch_one(job("not a url".to_string()), &ScanCancellation::new())
        .await;

    assert!(matches!(result.outcome, FetchOutcome::InvalidUrl(_)));
}

#[tokio::test]
async fn test_cancellation_skips_remaining_jobs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Arc::new(HttpClient::new(10).unwrap());
    let orchestrator = FetchOrchestrator::new(client, 2);

    let cancel = ScanCancellation::new();
    cancel.cancel();

    let jobs = vec![
        job(format!("{}/1", mock_server.uri())),
        job(format!("{}/2", mock_server.uri())),
        job(format!("{}/3", mock_server.uri())),
    ];

    let results = orchestrator.fetch_all(jobs, &cancel).await;

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(matches!(result.outcome, FetchOutcome::Cancelled));
    }
}

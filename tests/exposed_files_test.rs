// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Exposed Files Check Tests
 * Sensitive-path probing against a mock target
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;
use tutka_scanner::checks::ExposedFilesCheck;
use tutka_scanner::config::AppConfig;
use tutka_scanner::http_client::HttpClient;
use tutka_scanner::orchestrator::ScanCancellation;
use tutka_scanner::types::{ScanTarget, Severity};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn run_check(server: &MockServer) -> tutka_scanner::checks::ExposedFilesReport {
    let client = Arc::new(HttpClient::new(10).unwrap());
    let check = ExposedFilesCheck::new(client, AppConfig::default());
    let target = ScanTarget::parse(&format!("{}/", server.uri())).unwrap();
    check
        .run(&target, &ScanCancellation::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_exposed_env_file_scores_sixty() {
    let mock_server = MockServer::start().await;

    // Everything except /.env answers 404: the desired outcome
    Mock::given(method("GET"))
        .and(path("/.env"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("DB_HOST=localhost\nDB_PASS=secret"),
        )
        .mount(&mock_server)
        .await;

    let report = run_check(&mock_server).await;

    assert_eq!(report.exposed_files.len(), 1);
    let exposed = &report.exposed_files[0];
    assert_eq!(exposed.file, ".env");
    assert_eq!(exposed.severity, Severity::Critical);
    assert_eq!(exposed.category, "Config/System");
    assert!(exposed.url.ends_with("/.env"));

    assert_eq!(report.score, 60);
    assert!(report.scanned_count > 1);
}

#[tokio::test]
async fn test_soft_404_html_page_does_not_confirm() {
    let mock_server = MockServer::start().await;

    // A site serving its SPA shell with 200 for every path must not
    // produce findings
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html><html><body>Not found</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let report = run_check(&mock_server).await;

    assert!(report.exposed_files.is_empty());
    assert_eq!(report.score, 100);
}

#[tokio::test]
async fn test_git_head_and_sql_dump_detected_together() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/.git/HEAD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ref: refs/heads/main\n"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dump.sql"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("CREATE TABLE users (id INT);\nINSERT INTO users VALUES (1);"),
        )
        .mount(&mock_server)
        .await;

    let report = run_check(&mock_server).await;

    assert_eq!(report.exposed_files.len(), 2);
    // Critical .git/HEAD (-40) plus High dump.sql (-20)
    assert_eq!(report.score, 40);
}

#[tokio::test]
async fn test_all_404_is_clean_report() {
    let mock_server = MockServer::start().await;

    let report = run_check(&mock_server).await;

    assert!(report.exposed_files.is_empty());
    assert_eq!(report.score, 100);
    assert!(!report.timestamp.is_empty());
}

//! Integration suite against a mock deployment

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use erp_core::Config;
use erp_harness::{Category, Harness, run_suite, select_cases};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path, path_regex},
};

const TOKEN: &str = "suite-token";

async fn healthy_deployment(skip_redis: bool) -> MockServer {
    let server = MockServer::start().await;

    for health in ["/health", "/api/health/db", "/api/health/redis"] {
        if skip_redis && health.ends_with("redis") {
            continue;
        }
        Mock::given(method("GET"))
            .and(path(health))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .with_priority(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "admin123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": TOKEN,
                "user": {"id": 1, "username": "admin", "name": "관리자", "role": "admin"}
            }
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({"password": 42})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "invalid request body"
        })))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "아이디 또는 비밀번호가 올바르지 않습니다"
        })))
        .with_priority(5)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/api/"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "unauthorized"
        })))
        .with_priority(10)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<!DOCTYPE html><html><body>ERP</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_every_case_passes_on_healthy_deployment() {
    let server = healthy_deployment(false).await;
    let harness = Harness::new(&server.uri(), &server.uri(), &Config::default()).unwrap();

    let summary = run_suite(&harness, &select_cases(false)).await;
    let failures: Vec<_> = summary
        .results
        .iter()
        .filter_map(|result| result.outcome.as_ref().err())
        .collect();
    assert!(failures.is_empty(), "unexpected failures: {failures:?}");
    assert_eq!(summary.passed(), 10);
    assert_eq!(summary.exit_code(), 0);

    let report = summary.report(false);
    assert!(report.ends_with("\nPassed: 10, Failed: 0, Total: 10\n"));
}

#[tokio::test]
async fn test_missing_dependency_fails_the_run() {
    let server = healthy_deployment(true).await;
    let harness = Harness::new(&server.uri(), &server.uri(), &Config::default()).unwrap();

    let summary = run_suite(&harness, &select_cases(false)).await;
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.exit_code(), 1);

    let failed = summary.results.iter().find(|result| !result.passed()).unwrap();
    assert_eq!(failed.category, Category::Health);
    assert!(failed.outcome.as_ref().unwrap_err().starts_with("/api/health/redis"));
    assert!(summary.report(false).contains("❌ [health] health endpoints respond"));
}

#[tokio::test]
async fn test_urls_come_from_api_config() {
    let server = healthy_deployment(false).await;
    let mut config = Config::default();
    config.api.base_url = format!("{}/", server.uri());
    config.api.frontend_url = server.uri();

    let harness = Harness::from_config(&config).unwrap();
    assert_eq!(harness.base_url(), server.uri());
    assert_eq!(harness.frontend_url(), server.uri());

    let summary = run_suite(&harness, &select_cases(false)).await;
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_security_only_run() {
    let server = healthy_deployment(false).await;
    let harness = Harness::new(&server.uri(), &server.uri(), &Config::default()).unwrap();

    let summary = run_suite(&harness, &select_cases(true)).await;
    assert_eq!(summary.results.len(), 5);
    assert_eq!(summary.failed(), 0);
}

#[tokio::test]
async fn test_open_endpoint_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1}]
        })))
        .mount(&server)
        .await;

    let harness = Harness::new(&server.uri(), &server.uri(), &Config::default()).unwrap();
    let anonymous: Vec<_> = select_cases(true)
        .into_iter()
        .filter(|case| case.name.starts_with("anonymous"))
        .collect();

    let summary = run_suite(&harness, &anonymous).await;
    assert_eq!(summary.failed(), 1);
    assert_eq!(
        summary.results[0].outcome.as_ref().unwrap_err(),
        "/api/users: expected 401 or 403, got 200 OK"
    );
}

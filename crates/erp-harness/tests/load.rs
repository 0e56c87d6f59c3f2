//! Short load runs against a mock API

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use erp_core::Config;
use erp_harness::{LoadTarget, Ramp, RunOptions, Stage, Thresholds, run_load};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, path_regex},
};

fn fast_options() -> RunOptions {
    RunOptions {
        think_time: Duration::from_millis(20),
        tick: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_short_ramp_records_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/(invoices|assets)$"))
        .and(header("Authorization", "Bearer load-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .mount(&server)
        .await;

    let target = LoadTarget::new(
        &server.uri(),
        Arc::from("load-token"),
        vec!["/api/invoices".to_string(), "/api/assets".to_string()],
        Duration::from_secs(5),
    )
    .unwrap();
    let ramp = Ramp::new(vec![
        Stage::new(Duration::from_millis(300), 3),
        Stage::new(Duration::from_millis(200), 0),
    ]);

    let report = run_load(target, &ramp, fast_options(), CancellationToken::new()).await;
    assert!(report.requests > 0);
    assert_eq!(report.failures, 0);
    assert!(report.peak_vus >= 1 && report.peak_vus <= 3);
    assert!(Thresholds::default().evaluate(&report).iter().all(|t| t.passed));
}

#[tokio::test]
async fn test_server_errors_fail_thresholds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let target = LoadTarget::new(
        &server.uri(),
        Arc::from("load-token"),
        vec!["/api/notices".to_string()],
        Duration::from_secs(5),
    )
    .unwrap();
    let ramp = Ramp::new(vec![Stage::new(Duration::from_millis(300), 2)]);

    let report = run_load(target, &ramp, fast_options(), CancellationToken::new()).await;
    assert!(report.requests > 0);
    assert_eq!(report.failures, report.requests);

    let verdicts = Thresholds::default().evaluate(&report);
    assert!(!verdicts[1].passed);
}

#[tokio::test]
async fn test_cancelled_run_stops_early() {
    let server = MockServer::start().await;
    let target = LoadTarget::new(
        &server.uri(),
        Arc::from("load-token"),
        vec!["/api/users".to_string()],
        Duration::from_secs(5),
    )
    .unwrap();
    let ramp = Ramp::new(vec![Stage::new(Duration::from_secs(3600), 10)]);

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let report = run_load(target, &ramp, fast_options(), shutdown).await;
    assert!(report.duration_secs < 5.0);
}

#[tokio::test]
async fn test_connect_signs_in_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": "shared", "user": {"id": 1, "username": "admin"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api.base_url = server.uri();
    let target = LoadTarget::connect(&config).await.unwrap();
    assert_eq!(target.paths().len(), 6);
    assert_eq!(target.paths()[0], "/api/users");
}

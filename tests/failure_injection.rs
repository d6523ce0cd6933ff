//! Failure injection tests for the data source.
//!
//! Every failure mode must leave the service settled with an empty
//! snapshot rather than stuck in the loading state.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};

mod common;

#[tokio::test]
async fn test_http_source_success() {
    let addr = common::start_mock_source(200, common::FIXTURE).await;
    let service = common::http_service(addr, Duration::from_secs(2));

    let snapshot = service.load_initial_data().await;
    assert_eq!(snapshot.len(), 5);
    assert!(!service.get_loading_state().current());

    let usa = service.get_country_by_name("USA").current().unwrap();
    assert_eq!(usa.total_medals(), 338);
}

#[tokio::test]
async fn test_http_source_server_error() {
    let addr = common::start_mock_source(500, r#"{"error": "boom"}"#).await;
    let service = common::http_service(addr, Duration::from_secs(2));

    let snapshot = service.load_initial_data().await;
    assert!(snapshot.is_empty());

    let state = service.state();
    assert!(!state.is_loading);
    assert_eq!(state.generation, 1);
}

#[tokio::test]
async fn test_http_source_not_found() {
    let addr = common::start_mock_source(404, "{}").await;
    let service = common::http_service(addr, Duration::from_secs(2));

    assert!(service.load_initial_data().await.is_empty());
    assert!(service.find_country("Italy").await.is_none());
}

#[tokio::test]
async fn test_stalled_source_times_out() {
    let addr = common::start_stalled_source().await;
    let service = common::http_service(addr, Duration::from_millis(200));
    let server = common::server_for(service.clone());

    let started = Instant::now();
    let snapshot = service.load_initial_data().await;
    assert!(snapshot.is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!service.state().is_loading);

    let json = common::json_body(common::get(&server, "/api/dashboard").await).await;
    assert_eq!(json["loading"], false);
    assert_eq!(json["countryCount"], 0);
    assert_eq!(json["olympicCount"], 0);
    assert!(json["series"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_source() {
    // Bind and drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let service = common::http_service(addr, Duration::from_secs(2));

    assert!(service.load_initial_data().await.is_empty());
    assert!(service.state().is_settled());
}

#[tokio::test]
async fn test_malformed_payload() {
    let addr = common::start_mock_source(200, r#"[{"id": 1, "country": "Italy", "participations": "#).await;
    let service = common::http_service(addr, Duration::from_secs(2));

    assert!(service.load_initial_data().await.is_empty());
    assert!(!service.get_loading_state().current());
}

#[tokio::test]
async fn test_missing_file_serves_not_found() {
    let service = common::file_service("/nonexistent/olympic.json".into());
    let server = common::server_for(service.clone());
    service.load_initial_data().await;

    let response = common::get(&server, "/api/countries/Italy").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let olympics = common::json_body(common::get(&server, "/api/olympics").await).await;
    assert_eq!(olympics, serde_json::json!([]));
}

#[tokio::test]
async fn test_failed_reload_replaces_snapshot() {
    let path = common::write_fixture("failed-reload", common::FIXTURE);
    let service = common::file_service(path.clone());
    assert_eq!(service.load_initial_data().await.len(), 5);

    std::fs::write(&path, "not json").unwrap();
    assert!(service.reload().await.is_empty());

    let state = service.state();
    assert!(state.snapshot.is_empty());
    assert_eq!(state.generation, 2);

    std::fs::remove_file(path).unwrap_or_default();
}

#[tokio::test]
async fn test_cancelled_load_settles_state() {
    let addr = common::start_stalled_source().await;
    let service = common::http_service(addr, Duration::from_secs(5));

    let attempt = tokio::time::timeout(Duration::from_millis(100), service.load_initial_data()).await;
    assert!(attempt.is_err());

    let state = service.state();
    assert!(state.is_settled());
    assert!(state.snapshot.is_empty());

    let lookup = tokio::time::timeout(Duration::from_secs(1), service.find_country("Italy")).await;
    assert!(lookup.unwrap().is_none());
}

#[tokio::test]
async fn test_timed_out_reload_request_still_settles() {
    let addr = common::start_stalled_source().await;
    let service = common::http_service(addr, Duration::from_secs(2));
    let server = common::server_with_request_timeout(service.clone(), 1);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reload")
        .body(Body::empty())
        .unwrap();
    let response = common::send(&server, request).await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    let mut state = service.watch_state();
    let settled = tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| s.is_settled()))
        .await
        .expect("Reload never settled")
        .unwrap()
        .clone();
    assert!(!settled.is_loading);
    assert_eq!(settled.generation, 1);

    let health = common::json_body(common::get(&server, "/health").await).await;
    assert_eq!(health["loading"], false);
}

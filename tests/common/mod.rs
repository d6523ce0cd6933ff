//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use olympic_dashboard::source::{DataSource, Fetcher};
use olympic_dashboard::{DashboardConfig, HttpServer, OlympicService};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Five countries, plus a repeated Spain record and a repeated Italy 2016 entry.
pub const FIXTURE: &str = r#"[
  {"id": 1, "country": "Italy", "participations": [
    {"id": 1, "year": 2012, "city": "Londres", "medalsCount": 28, "athleteCount": 372},
    {"id": 2, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 28, "athleteCount": 375},
    {"id": 3, "year": 2020, "city": "Tokyo", "medalsCount": 40, "athleteCount": 381},
    {"id": 4, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 999, "athleteCount": 1}
  ]},
  {"id": 2, "country": "Spain", "participations": [
    {"id": 1, "year": 2012, "city": "Londres", "medalsCount": 20, "athleteCount": 315},
    {"id": 2, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 17, "athleteCount": 312},
    {"id": 3, "year": 2020, "city": "Tokyo", "medalsCount": 17, "athleteCount": 321}
  ]},
  {"id": 3, "country": "USA", "participations": [
    {"id": 1, "year": 2012, "city": "Londres", "medalsCount": 104, "athleteCount": 539},
    {"id": 2, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 121, "athleteCount": 555},
    {"id": 3, "year": 2020, "city": "Tokyo", "medalsCount": 113, "athleteCount": 613}
  ]},
  {"id": 4, "country": "Germany", "participations": [
    {"id": 1, "year": 2012, "city": "Londres", "medalsCount": 44, "athleteCount": 425},
    {"id": 2, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 44, "athleteCount": 422},
    {"id": 3, "year": 2020, "city": "Tokyo", "medalsCount": 37, "athleteCount": 425}
  ]},
  {"id": 5, "country": "France", "participations": [
    {"id": 1, "year": 2012, "city": "Londres", "medalsCount": 35, "athleteCount": 330},
    {"id": 2, "year": 2016, "city": "Rio de Janeiro", "medalsCount": 45, "athleteCount": 395},
    {"id": 3, "year": 2020, "city": "Tokyo", "medalsCount": 33, "athleteCount": 401}
  ]},
  {"id": 6, "country": "Spain", "participations": []}
]"#;

/// Write `content` to a uniquely named file in the temp directory.
pub fn write_fixture(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("olympic-it-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

/// Start a mock source that answers every request with `status` and `body`.
pub async fn start_mock_source(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;

                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a source that accepts connections and never answers.
pub async fn start_stalled_source() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

pub fn file_service(path: PathBuf) -> Arc<OlympicService> {
    Arc::new(OlympicService::new(Fetcher::new(
        DataSource::File(path),
        Duration::from_secs(2),
        Duration::ZERO,
    )))
}

pub fn http_service(addr: SocketAddr, timeout: Duration) -> Arc<OlympicService> {
    let source = DataSource::Http {
        url: format!("http://{}/assets/mock/olympic.json", addr).parse().unwrap(),
        client: reqwest::Client::builder().no_proxy().build().unwrap(),
    };
    Arc::new(OlympicService::new(Fetcher::new(source, timeout, Duration::ZERO)))
}

pub fn server_for(service: Arc<OlympicService>) -> HttpServer {
    HttpServer::new(DashboardConfig::default(), service)
}

pub fn server_with_request_timeout(service: Arc<OlympicService>, secs: u64) -> HttpServer {
    let mut config = DashboardConfig::default();
    config.timeouts.request_secs = secs;
    HttpServer::new(config, service)
}

/// Send a request through the router without a network listener.
pub async fn send(server: &HttpServer, request: Request<Body>) -> Response<Body> {
    server.router().oneshot(request).await.unwrap()
}

pub async fn get(server: &HttpServer, uri: &str) -> Response<Body> {
    send(server, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

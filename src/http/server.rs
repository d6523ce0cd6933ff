//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, security headers)
//! - Keep the dashboard aggregate warm via a service subscription
//! - Serve over plain TCP or TLS with graceful shutdown

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, watch};
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::TlsConfig;
use crate::config::DashboardConfig;
use crate::dashboard::{DashboardAggregator, Palette};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::source::{OlympicService, Subscription};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OlympicService>,
    pub aggregator: Arc<Mutex<DashboardAggregator>>,
    pub palette: Palette,
    pub default_color: String,
    /// Flips to `true` when the server starts draining; long-lived streams end on it.
    pub closing: watch::Receiver<bool>,
}

/// HTTP server for the dashboard API.
pub struct HttpServer {
    router: Router,
    config: DashboardConfig,
    service: Arc<OlympicService>,
    subscription: Subscription,
    closing: watch::Sender<bool>,
}

impl HttpServer {
    /// Create a new HTTP server around `service`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: DashboardConfig, service: Arc<OlympicService>) -> Self {
        let palette = Palette::from_config(&config.palette);
        let aggregator = Arc::new(Mutex::new(DashboardAggregator::new(palette.clone())));

        let subscription = service.subscribe({
            let aggregator = aggregator.clone();
            move |state| {
                let mut aggregator = aggregator.lock().unwrap_or_else(PoisonError::into_inner);
                if aggregator.apply(state) {
                    tracing::debug!(
                        generation = state.generation,
                        loading = state.is_loading,
                        countries = aggregator.summary().country_count,
                        "Dashboard recomputed"
                    );
                }
            }
        });

        let (closing, closing_rx) = watch::channel(false);
        let state = AppState {
            service: service.clone(),
            aggregator,
            palette,
            default_color: config.palette.default_detail_color.clone(),
            closing: closing_rx,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            service,
            subscription,
            closing,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DashboardConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/olympics", get(handlers::get_olympics))
            .route("/api/dashboard", get(handlers::get_dashboard))
            .route("/api/dashboard/select", post(handlers::select_country))
            .route("/api/countries", get(handlers::missing_country))
            .route("/api/countries/", get(handlers::missing_country))
            .route("/api/countries/{name}", get(handlers::get_country))
            .route("/api/reload", post(handlers::reload))
            .route("/api/events", get(handlers::events))
            .route_layer(middleware::from_fn(track_requests))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer());

        if !config.security.enable_headers {
            return router;
        }

        router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
    }

    /// A clone of the configured router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn service(&self) -> &Arc<OlympicService> {
        &self.service
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let HttpServer {
            router,
            subscription,
            closing,
            ..
        } = self;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
                closing.send_replace(true);
            })
            .await?;

        drop(subscription);
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on the configured bind address.
    pub async fn run_tls(self, tls: &TlsConfig, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .listener
            .bind_address
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let rustls = load_tls_config(&tls.cert_path, &tls.key_path).await?;

        tracing::info!(address = %addr, "HTTPS server starting");

        let HttpServer {
            router,
            subscription,
            closing,
            ..
        } = self;

        let handle = axum_server::Handle::new();
        tokio::spawn({
            let handle = handle.clone();
            async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTPS server draining");
                closing.send_replace(true);
                handle.graceful_shutdown(Some(Duration::from_secs(10)));
            }
        });

        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(router.into_make_service())
            .await?;

        drop(subscription);
        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Count requests per matched route and status.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16());
    response
}

//! API handlers.

use std::convert::Infallible;
use std::sync::PoisonError;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Redirect, Response,
    },
    Json,
};
use futures_util::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::dashboard::{DashboardSummary, DetailOutcome, DisplayColor, SelectionEvent};
use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::models::CountryRecord;
use crate::source::DashboardState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub loaded: bool,
    pub loading: bool,
    pub countries: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let current = state.service.state();
    Json(HealthStatus {
        status: "ok",
        loaded: current.is_settled(),
        loading: current.is_loading,
        countries: current.snapshot.len(),
    })
}

/// The raw cached snapshot.
pub async fn get_olympics(State(state): State<AppState>) -> Json<Vec<CountryRecord>> {
    Json(state.service.state().snapshot.to_vec())
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let current = state.service.state();
    let mut aggregator = state.aggregator.lock().unwrap_or_else(PoisonError::into_inner);
    aggregator.apply(&current);
    Json(aggregator.summary().clone())
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    #[serde(flatten)]
    pub event: SelectionEvent,
    pub detail_path: String,
}

pub async fn select_country(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let current = state.service.state();
    let event = state
        .palette
        .select(&current.snapshot, name)
        .ok_or_else(|| ApiError::CountryNotFound(name.to_string()))?;

    tracing::info!(
        request_id = %request_id(&headers),
        country = %event.country_name,
        color = %event.assigned_color,
        "Country selected"
    );

    Ok(Json(SelectionResponse {
        detail_path: event.detail_path(),
        event,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub color: Option<String>,
}

/// Detail for one country.
///
/// Holds until the first load has settled, so a 404 means the country is
/// genuinely absent rather than not loaded yet.
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<DetailQuery>,
    headers: HeaderMap,
) -> Response {
    let name = name.trim();
    if name.is_empty() {
        return Redirect::to("/").into_response();
    }

    let color = DisplayColor::parse_or(query.color.as_deref(), &state.default_color);
    let record = state.service.find_country(name).await;

    match DetailOutcome::resolve(name, record.as_ref(), color) {
        DetailOutcome::Found(detail) => Json(detail).into_response(),
        DetailOutcome::NotFound { country } => {
            tracing::info!(request_id = %request_id(&headers), country = %country, "Country not found");
            ApiError::CountryNotFound(country).into_response()
        }
    }
}

/// No country given: send the client back to the dashboard root.
pub async fn missing_country() -> Redirect {
    Redirect::to("/")
}

#[derive(Debug, Serialize)]
pub struct ReloadResult {
    pub countries: usize,
    pub generation: u64,
}

pub async fn reload(State(state): State<AppState>, headers: HeaderMap) -> Json<ReloadResult> {
    tracing::info!(request_id = %request_id(&headers), "Reload requested over HTTP");

    // The load runs on its own task so a timed-out or disconnected
    // request cannot cancel it halfway.
    let service = state.service.clone();
    let countries = match tokio::spawn(async move { service.reload().await }).await {
        Ok(snapshot) => snapshot.len(),
        Err(e) => {
            tracing::error!(error = %e, "Reload task failed");
            state.service.state().snapshot.len()
        }
    };

    Json(ReloadResult {
        countries,
        generation: state.service.state().generation,
    })
}

#[derive(Debug, Serialize)]
pub struct StateEvent {
    pub loading: bool,
    pub generation: u64,
    pub countries: usize,
}

impl From<&DashboardState> for StateEvent {
    fn from(state: &DashboardState) -> Self {
        Self {
            loading: state.is_loading,
            generation: state.generation,
            countries: state.snapshot.len(),
        }
    }
}

/// Server-sent events: one `state` event now and one per state change.
///
/// The stream ends when the server starts shutting down.
pub async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut closing = state.closing.clone();
    let stream = state
        .service
        .watch(|current| StateEvent::from(current))
        .into_stream()
        .map(|update| {
            let event = Event::default()
                .event("state")
                .json_data(&update)
                .unwrap_or_else(|_| Event::default().event("state").data("{}"));
            Ok(event)
        })
        .take_until(async move {
            let _ = closing.wait_for(|closed| *closed).await;
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

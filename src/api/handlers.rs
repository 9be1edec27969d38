//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, StateResponse, TimelineQuery, TimelineRecord};

/// Returns simulation settings, disaster report, and latest tick record.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        settings: state.settings.clone(),
        report: state.report.clone(),
        latest_tick: state.records.last().map(TimelineRecord::from),
    })
}

/// Returns tick records, optionally filtered by elapsed-seconds range.
///
/// `GET /timeline` → 200 + `Vec<TimelineRecord>` JSON
/// `GET /timeline?from=N&to=M` → filtered range (inclusive)
/// `GET /timeline?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u64::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TimelineRecord> = state
        .records
        .iter()
        .filter(|r| r.elapsed_s >= from && r.elapsed_s <= to)
        .map(TimelineRecord::from)
        .collect();

    Ok(Json(records))
}

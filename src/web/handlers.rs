//! HTTP request handlers

use super::state::AppState;
use crate::search::SearchError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query, matched against message content and user name
    pub query: Option<String>,
    /// Page number, 1-indexed
    pub page: Option<u32>,
    /// Records per page
    pub limit: Option<u32>,
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return validation_error(&state, "query must be a non-empty string"),
    };

    let page = params.page.unwrap_or(1);
    if page < 1 {
        return validation_error(&state, "page must be at least 1");
    }

    let limit = params.limit.unwrap_or(state.settings.search.default_limit);
    if limit < 1 || limit > state.settings.search.max_limit {
        let detail = format!(
            "limit must be between 1 and {}",
            state.settings.search.max_limit
        );
        return validation_error(&state, &detail);
    }

    let started = Instant::now();
    match state.engine.search(&query, page, limit) {
        Ok(result) => {
            state.metrics.record_search(started.elapsed());
            Json(result).into_response()
        }
        Err(SearchError::Unavailable) => {
            state.metrics.record_unavailable();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "search service is initializing or failed to load data"
                })),
            )
                .into_response()
        }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, records) = match state.snapshot.get() {
        Some(snapshot) => ("ok", snapshot.len()),
        None => ("loading", 0),
    };

    Json(json!({
        "status": status,
        "version": crate::VERSION,
        "records": records,
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot.get().map(|snapshot| {
        json!({
            "records": snapshot.len(),
            "expected_total": snapshot.expected_total(),
            "completeness": snapshot.completeness(),
            "loaded_at": snapshot.loaded_at().to_rfc3339(),
        })
    });

    Json(json!({
        "searches": {
            "total": state.metrics.total_searches(),
            "unavailable": state.metrics.unavailable_responses(),
            "rejected": state.metrics.rejected_requests(),
            "avg_latency_us": state.metrics.avg_search_latency_us(),
        },
        "snapshot": snapshot,
    }))
}

/// Reject a request that failed parameter validation
fn validation_error(state: &AppState, detail: &str) -> Response {
    state.metrics.record_rejected();
    (StatusCode::BAD_REQUEST, Json(json!({ "error": detail }))).into_response()
}

//! REST API handlers.
//!
//! The two transform handlers decode the body with
//! [`TransformRequest::decode`], run the transform on the blocking pool and
//! reply with `{"result": ...}`.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{debug, warn};

use faf_core::{NdArray, TransformKind, TransformRequest};
use faf_metrics::Outcome;

use crate::ApiState;
use crate::error::ApiError;

/// Successful transform response.
#[derive(serde::Serialize)]
struct TransformResponse {
    result: NdArray,
}

// ── Transforms ─────────────────────────────────────────────────

/// POST /api/dfaf
pub async fn dfaf(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    handle_transform(state, TransformKind::Dfaf, body).await
}

/// POST /api/pfaf
pub async fn pfaf(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    handle_transform(state, TransformKind::Pfaf, body).await
}

async fn handle_transform(
    state: ApiState,
    kind: TransformKind,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = run_transform(&state, kind, body).await;

    let (outcome, elements) = match &result {
        Ok(arr) => (Outcome::Ok, arr.len()),
        Err(e) if e.is_client_error() => (Outcome::ClientError, 0),
        Err(_) => (Outcome::ServerError, 0),
    };
    state
        .metrics
        .record(kind, started.elapsed(), elements, outcome);

    match result {
        Ok(result) => Json(TransformResponse { result }).into_response(),
        Err(e) => {
            warn!(endpoint = %kind, error = %e, "transform request rejected");
            e.into_response()
        }
    }
}

async fn run_transform(
    state: &ApiState,
    kind: TransformKind,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<NdArray, ApiError> {
    let Json(body) = body?;
    let req = TransformRequest::decode(kind, &body, &state.limits)?;
    debug!(
        endpoint = %kind,
        shape = ?req.x.shape(),
        a = req.a,
        n_iterations = req.n_iterations,
        "running transform"
    );

    let out = tokio::task::spawn_blocking(move || req.run())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(out)
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let body = faf_metrics::render_prometheus(&state.metrics.snapshot());
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

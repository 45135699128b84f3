//! Request handlers for the ping and health endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{error::ApiError, AppState};
use crate::auth::TOKEN_HEADER;
use crate::models::{LogRequest, LogResponse};

/// Record a location ping and report fence membership
pub async fn log_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<LogResponse>, ApiError> {
    if !state.auth.permits(headers.get(TOKEN_HEADER)) {
        warn!("Rejected ping: missing or mismatched {} header", TOKEN_HEADER);
        return Err(ApiError::Unauthorized);
    }

    let body = body.map_err(|e| {
        warn!("Rejected ping: could not read body: {}", e);
        ApiError::MalformedRequest
    })?;
    let request = parse_log_request(&headers, &body)?;

    let point = request.point().map_err(|e| {
        warn!("Rejected ping: {}", e);
        ApiError::InvalidCoordinate
    })?;

    let result = state.geofence.evaluate(point);

    info!(
        target: "fencepost::ping",
        event = %request.event_name(),
        lat = point.lat,
        lng = point.lng,
        distance_m = result.rounded_distance_m(),
        inside = result.inside,
        ts = %request.ts_text(),
        "geofence ping"
    );

    Ok(Json(LogResponse::from(result)))
}

/// Decode the body.
///
/// An empty JSON value (null, false, 0, "", [], {}) counts as no body. Any
/// other value that is not an object has no coordinates to read.
fn parse_log_request(headers: &HeaderMap, body: &[u8]) -> Result<LogRequest, ApiError> {
    if !is_json_content_type(headers) {
        warn!("Rejected ping: body is not declared as JSON");
        return Err(ApiError::MalformedRequest);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected ping: invalid JSON: {}", e);
        ApiError::MalformedRequest
    })?;

    if is_empty_json(&value) {
        warn!("Rejected ping: empty JSON body");
        return Err(ApiError::MalformedRequest);
    }

    match value {
        Value::Object(map) => serde_json::from_value(Value::Object(map)).map_err(|e| {
            warn!("Rejected ping: unexpected body shape: {}", e);
            ApiError::MalformedRequest
        }),
        other => {
            warn!("Rejected ping: body is not a JSON object: {}", other);
            Err(ApiError::InvalidCoordinate)
        }
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// `application/json` or any `application/*+json` media type
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        radius_m: state.geofence.radius_m(),
        auth: state.auth.label(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    radius_m: f64,
    auth: &'static str,
}

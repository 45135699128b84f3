//! Wire types for the `POST /log` endpoint.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::point::{CoordinateError, GeoPoint};
use crate::geofence::MembershipResult;

/// Event name logged when the client sends none
pub const DEFAULT_EVENT: &str = "unknown";

/// Location ping posted by a device.
///
/// Every field is kept as raw JSON so that a bad `lat`/`lng` is reported as
/// an invalid coordinate instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogRequest {
    /// Latitude: JSON number or numeric string
    pub lat: Option<Value>,
    /// Longitude: JSON number or numeric string
    pub lng: Option<Value>,
    /// Free-form event label
    pub event: Option<Value>,
    /// Client timestamp, passed through untouched
    pub ts: Option<Value>,
}

impl LogRequest {
    /// Parse and validate the reported position
    pub fn point(&self) -> Result<GeoPoint, CoordinateError> {
        let lat = parse_coordinate("lat", self.lat.as_ref())?;
        let lng = parse_coordinate("lng", self.lng.as_ref())?;
        GeoPoint::validated(lat, lng)
    }

    /// Event label for log lines
    pub fn event_name(&self) -> Cow<'_, str> {
        match &self.event {
            None => Cow::Borrowed(DEFAULT_EVENT),
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    /// Timestamp rendered as JSON text (`null` when absent)
    pub fn ts_text(&self) -> String {
        self.ts
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| Value::Null.to_string())
    }
}

/// Accept a JSON number or a string holding one
pub fn parse_coordinate(
    name: &'static str,
    value: Option<&Value>,
) -> Result<f64, CoordinateError> {
    match value {
        None | Some(Value::Null) => Err(CoordinateError::Missing(name)),
        Some(Value::Number(n)) => n.as_f64().ok_or(CoordinateError::NotNumeric(name)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::NotNumeric(name)),
        Some(_) => Err(CoordinateError::NotNumeric(name)),
    }
}

/// Successful response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub ok: bool,
    pub inside: bool,
    /// Unrounded great-circle distance to the fence center
    pub distance_m: f64,
}

impl From<MembershipResult> for LogResponse {
    fn from(result: MembershipResult) -> Self {
        Self {
            ok: true,
            inside: result.inside,
            distance_m: result.distance_m,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

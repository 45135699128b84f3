//! Geographic point reported by a device.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a coordinate pair was rejected at the request boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("{0} is missing")]
    Missing(&'static str),

    #[error("{0} is not numeric")]
    NotNumeric(&'static str),

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Geographic point (lat/lng, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point without range checks
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a point, rejecting non-finite or out-of-range degrees
    pub fn validated(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() {
            return Err(CoordinateError::NotFinite("lat"));
        }
        if !lng.is_finite() {
            return Err(CoordinateError::NotFinite("lng"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lng, p.lat)
    }
}

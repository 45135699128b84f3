//! Circular geofence and the membership check.

use thiserror::Error;
use tracing::debug;

use super::haversine_m;
use crate::models::{CoordinateError, GeoPoint};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofenceError {
    #[error("invalid geofence center: {0}")]
    InvalidCenter(#[from] CoordinateError),

    #[error("geofence radius must be a finite, non-negative number of meters (got {0})")]
    InvalidRadius(f64),
}

/// Fence center plus radius. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceConfig {
    center: GeoPoint,
    radius_m: f64,
}

impl GeofenceConfig {
    pub fn new(center: GeoPoint, radius_m: f64) -> Result<Self, GeofenceError> {
        let center = GeoPoint::validated(center.lat, center.lng)?;
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(GeofenceError::InvalidRadius(radius_m));
        }
        Ok(Self { center, radius_m })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Distance from `point` to the center, and whether it is within the radius
    pub fn evaluate(&self, point: GeoPoint) -> MembershipResult {
        let distance_m = haversine_m(point, self.center);
        let inside = distance_m <= self.radius_m;

        debug!(
            "Geofence check at ({}, {}): {:.3} m, inside={}",
            point.lat, point.lng, distance_m, inside
        );

        MembershipResult { distance_m, inside }
    }
}

/// Outcome of a single membership check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipResult {
    pub distance_m: f64,
    pub inside: bool,
}

impl MembershipResult {
    /// Distance rounded to one decimal, as written to log lines.
    ///
    /// Rounds the exact binary value to the nearest tenth, ties to even.
    pub fn rounded_distance_m(&self) -> f64 {
        format!("{:.1}", self.distance_m)
            .parse()
            .unwrap_or(self.distance_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence() -> GeofenceConfig {
        GeofenceConfig::new(GeoPoint::new(28.453489, 77.495797), 150.0).unwrap()
    }

    #[test]
    fn test_center_is_inside() {
        let result = fence().evaluate(fence().center());
        assert_eq!(result.distance_m, 0.0);
        assert!(result.inside);

        let zero = GeofenceConfig::new(GeoPoint::new(10.0, 10.0), 0.0).unwrap();
        assert!(zero.evaluate(GeoPoint::new(10.0, 10.0)).inside);
    }

    #[test]
    fn test_fixture_points() {
        let near = fence().evaluate(GeoPoint::new(28.454489, 77.495797));
        assert!(near.inside);
        assert_eq!(near.rounded_distance_m(), 111.2);

        let far = fence().evaluate(GeoPoint::new(28.460000, 77.495797));
        assert!(!far.inside);
        assert!(far.distance_m > 700.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = GeoPoint::new(28.453489, 77.495797);
        let edge = GeoPoint::new(28.455, 77.497);
        let radius = haversine_m(edge, center);

        let fence = GeofenceConfig::new(center, radius).unwrap();
        let result = fence.evaluate(edge);
        assert_eq!(result.distance_m, radius);
        assert!(result.inside);

        let tighter = GeofenceConfig::new(center, radius - 1e-6).unwrap();
        assert!(!tighter.evaluate(edge).inside);
    }

    #[test]
    fn test_rejects_bad_config() {
        let center = GeoPoint::new(0.0, 0.0);
        assert_eq!(
            GeofenceConfig::new(center, -1.0),
            Err(GeofenceError::InvalidRadius(-1.0))
        );
        assert!(GeofenceConfig::new(center, f64::INFINITY).is_err());
        assert!(matches!(
            GeofenceConfig::new(GeoPoint::new(91.0, 0.0), 10.0),
            Err(GeofenceError::InvalidCenter(_))
        ));
    }

    #[test]
    fn test_rounding() {
        let r = MembershipResult {
            distance_m: 149.96,
            inside: true,
        };
        assert_eq!(r.rounded_distance_m(), 150.0);
        let r = MembershipResult {
            distance_m: 12.34,
            inside: true,
        };
        assert_eq!(r.rounded_distance_m(), 12.3);
    }

    #[test]
    fn test_rounding_near_ties() {
        let round = |distance_m| {
            MembershipResult {
                distance_m,
                inside: true,
            }
            .rounded_distance_m()
        };
        // 0.15 and 1.45 sit just below the tie in binary
        assert_eq!(round(0.15), 0.1);
        assert_eq!(round(1.45), 1.4);
        // exact tie goes to even
        assert_eq!(round(111.25), 111.2);
        assert_eq!(round(111.75), 111.8);
    }
}

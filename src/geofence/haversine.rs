//! Great-circle distance on a spherical Earth.

use crate::models::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two points.
///
/// No input checks: NaN in, NaN out. Callers validate coordinates first.
pub fn haversine_m(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

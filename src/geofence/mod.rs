//! Geofence membership evaluation.
//!
//! A fence is a circle on the Earth's surface; membership is decided by the
//! haversine distance to its center.

mod evaluator;
mod haversine;

pub use evaluator::{GeofenceConfig, GeofenceError, MembershipResult};
pub use haversine::{haversine_m, EARTH_RADIUS_M};

//! Fencepost - geofence membership logging service
//!
//! Devices post their position; the service answers whether the position lies
//! inside a fixed circular geofence and emits a structured log line per ping.

pub mod api;
pub mod auth;
pub mod config;
pub mod geofence;
pub mod models;

pub use geofence::{haversine_m, GeofenceConfig, MembershipResult};
pub use models::GeoPoint;

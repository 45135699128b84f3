//! Core data models for the geofence service.

pub mod ping;
pub mod point;

pub use ping::{ErrorBody, LogRequest, LogResponse, DEFAULT_EVENT};
pub use point::{CoordinateError, GeoPoint};

//! HTTP surface: the ping endpoint, a health check and the static page.

mod error;
mod handlers;

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::error;

pub use error::ApiError;
pub use handlers::{health_handler, log_handler, HealthResponse};

use crate::auth::AuthPolicy;
use crate::config::ServiceConfig;
use crate::geofence::GeofenceConfig;

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub geofence: GeofenceConfig,
    pub auth: AuthPolicy,
    pub static_dir: PathBuf,
}

impl From<&ServiceConfig> for AppState {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            geofence: config.geofence,
            auth: config.auth.clone(),
            static_dir: config.static_dir.clone(),
        }
    }
}

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route_service("/", index)
        .nest_service("/static", assets)
        .route("/health", get(health_handler))
        .route("/log", post(log_handler))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);
    ApiError::Internal.into_response()
}

//! Geofence ping server.
//!
//! Accepts location pings over HTTP, reports fence membership and logs
//! each ping for later analysis.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fencepost::api::{router, AppState};
use fencepost::config::{FileConfig, Overrides, ServiceConfig};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fencepost")]
#[command(about = "Geofence membership logging server")]
struct Args {
    /// Optional TOML config file
    #[arg(short, long, env = "GEOFENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Geofence center latitude
    #[arg(long, env = "GEOFENCE_CENTER_LAT", allow_hyphen_values = true)]
    center_lat: Option<f64>,

    /// Geofence center longitude
    #[arg(long, env = "GEOFENCE_CENTER_LNG", allow_hyphen_values = true)]
    center_lng: Option<f64>,

    /// Geofence radius in meters
    #[arg(long, env = "GEOFENCE_RADIUS_M")]
    radius_m: Option<f64>,

    /// Shared secret expected in X-API-Token (empty disables the check)
    #[arg(long, env = "SECRET_TOKEN", hide_env_values = true)]
    secret_token: Option<String>,

    /// Listen host
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory holding index.html and other static assets
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            center_lat: self.center_lat,
            center_lng: self.center_lng,
            radius_m: self.radius_m,
            secret_token: self.secret_token.clone(),
            host: self.host.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_format)?;

    let file = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            FileConfig::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => FileConfig::default(),
    };
    let config =
        ServiceConfig::resolve(file, args.overrides()).context("Invalid configuration")?;

    let center = config.geofence.center();
    info!("Fencepost Server");
    info!(
        "Geofence center ({}, {}), radius {} m, auth {}",
        center.lat,
        center.lng,
        config.geofence.radius_m(),
        config.auth.label()
    );

    let state = Arc::new(AppState::from(&config));
    let app = router(state);

    let address = config.listen_addr();
    info!("Starting server on {}", address);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().flatten_event(true).finish())?
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

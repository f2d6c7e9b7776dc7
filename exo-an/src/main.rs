//! exo-an - Exoplanet Analysis service
//!
//! **Module Identity:**
//! - Name: exo-an (Exoplanet Analysis)
//! - Default port: 8000
//!
//! Serves trained transit classifiers over HTTP and the pre-cleaned dataset
//! tables they were trained on.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exo_common::config::{
    load_toml_config, ConfigOverrides, ConfigResolver, ServiceConfig, TomlConfig,
};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exo_an::AppState;

/// Command-line arguments for exo-an
#[derive(Parser, Debug)]
#[command(name = "exo-an")]
#[command(about = "Exoplanet transit analysis service")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "EXO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "EXO_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EXO_PORT")]
    port: Option<u16>,

    /// Directory holding modelo_<variant>_exoplanetas.json artifacts
    #[arg(long, env = "EXO_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Directory holding <id>_clean.csv dataset tables
    #[arg(long, env = "EXO_DATASETS_DIR")]
    datasets_dir: Option<PathBuf>,

    /// Seed for mock batch labels (reproducible runs without models)
    #[arg(long, env = "EXO_MOCK_SEED")]
    mock_seed: Option<u64>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Load both models at startup instead of on first request
    #[arg(long)]
    preload: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing exists; its warnings are replayed below
    let resolver = ConfigResolver::new("exo-an");
    let config_path = resolver.resolve(args.config.as_deref());
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let config = ServiceConfig::from_layers(
        ConfigOverrides {
            host: args.host,
            port: args.port,
            models_dir: args.models_dir,
            datasets_dir: args.datasets_dir,
            mock_seed: args.mock_seed,
            log_level: args.log_level,
        },
        toml_config,
    );

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "exo_an={level},exo_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting exo-an (Exoplanet Analysis) service");
    info!(
        "Version: {} (git {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config: {}", path.display()),
        Some(path) => warn!("Config file not found at {} (using defaults)", path.display()),
        None => warn!("No config directory available (using defaults)"),
    }
    if let Some(seed) = config.mock_seed {
        info!("Mock labels seeded with {}", seed);
    }

    let state = AppState::new(&config);
    info!("Models: {}", state.orchestrator.registry().models_dir().display());
    info!("Datasets: {}", state.datasets.datasets_dir().display());

    if args.preload {
        info!("Preloading models");
        state.orchestrator.registry().preload().await;
    }

    let app = exo_an::build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

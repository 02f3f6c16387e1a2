//! Asteroid Dodge - terminal arcade game
//!
//! Steer a ship through an asteroid field that grows every few seconds.
//! Two tasks cooperate:
//! - the game session owns the state and runs the fixed-tick simulation
//! - the terminal frontend draws frames and forwards keyboard input

mod config;
mod game;
mod render;
mod store;
mod util;

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};
use crate::game::spawn::Spawner;
use crate::game::GameSession;
use crate::store::{BestTimeStore, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config)?;

    info!("Starting Asteroid Dodge");
    info!(
        width = config.bounds.width,
        height = config.bounds.height,
        tick_ms = config.tick.as_millis() as u64,
        "Playfield configured"
    );

    let storage = match LocalStorage::open(&config.storage_path).await {
        Ok(storage) => storage,
        Err(e) => {
            warn!(path = %config.storage_path.display(), error = %e, "Starting with empty storage");
            LocalStorage::empty(&config.storage_path)
        }
    };
    let best_store = BestTimeStore::new(storage);
    if let Some(at) = best_store.achieved_at() {
        info!(best_ms = best_store.load(), achieved_at = %at, "Found a previous best time");
    }

    let spawner = match config.seed {
        Some(seed) => Spawner::new(seed),
        None => Spawner::from_entropy(),
    };

    let (session, handle) = GameSession::new(&config, spawner, best_store);
    let session_task = tokio::spawn(session.run());

    let result = render::terminal::run(&config, handle, shutdown_signal()).await;

    session_task.await?;
    info!("Shutdown complete");
    result
}

/// Initialize tracing/logging into the log file
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init(),
    }

    Ok(())
}

/// Resolves on SIGTERM, or on SIGINT when the terminal is not in raw mode
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

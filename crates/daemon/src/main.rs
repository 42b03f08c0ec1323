// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `svd`: loads the configuration document, connects to LKD, and runs the
//! alert engine until told to stop.

mod env;

use std::process::ExitCode;
use std::sync::Arc;

use sv_bus::{BusClient, TcpBusClient};
use sv_core::ObjectValue;
use sv_engine::Engine;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] sv_config::ConfigError),
    #[error("failed to connect to the bus backend: {0}")]
    Bus(#[from] sv_bus::BusError),
    #[error("failed to build the engine: {0}")]
    Engine(#[from] sv_core::EngineError),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "svd failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config_path = env::config_path();
    info!(path = %config_path.display(), "loading configuration");
    let config = sv_config::load(&config_path)?;

    let bus_addr = format!("{}:{}", config.services.host, config.services.port);
    info!(addr = %bus_addr, "connecting to bus backend");
    let bus: Arc<dyn BusClient> = Arc::new(TcpBusClient::connect(bus_addr).await?);

    let engine = Engine::new(config, bus.clone())?;

    let dispatch = {
        let engine = engine.clone();
        Arc::new(move |object: sv_core::ObjectId, value: ObjectValue| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.on_object_changed(object, value).await });
        })
    };
    bus.subscribe(dispatch);

    info!("svd started");
    wait_for_shutdown().await;
    info!("svd shutting down");

    Ok(())
}

/// Waits for either Ctrl-C or SIGTERM (the signal used by systemd/docker to
/// request a graceful stop).
async fn wait_for_shutdown() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

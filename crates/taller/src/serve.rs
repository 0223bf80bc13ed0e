// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taller serve` command implementation.
//!
//! Builds the store, gateway and controller from configuration, installs the
//! Prometheus recorder, and serves the HTTP API until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing::{info, warn};

use taller_api::{ApiState, AuthConfig, HealthState, ServerConfig};
use taller_config::TallerConfig;
use taller_core::TallerError;

use crate::bootstrap;

/// Runs the `taller serve` command.
pub async fn run_serve(config: TallerConfig) -> Result<(), TallerError> {
    info!(
        environment = ?config.app.environment,
        channel = %config.messaging.channel,
        "starting taller serve"
    );

    let prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>> =
        match taller_lifecycle::recording::install_recorder() {
            Ok(handle) => {
                Some(Arc::new(move || handle.render()) as Arc<dyn Fn() -> String + Send + Sync>)
            }
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        };

    let controller = bootstrap::build_controller(&config).await?;
    let store = controller.store().clone();
    let notifier = controller.notifier().clone();

    let production = config.is_production();
    if production && config.server.admin_token.is_none() {
        warn!("no server.admin_token configured -- admin routes will reject every request");
    }

    let state = ApiState {
        controller,
        auth: AuthConfig::new(config.server.admin_token.clone(), production),
        health: HealthState::new(prometheus_render),
    };
    let server_config = ServerConfig {
        host: config.server.bind_address.clone(),
        port: config.server.port,
    };

    taller_api::start_server(&server_config, state, shutdown_signal()).await?;

    if let Err(e) = notifier.shutdown().await {
        warn!(error = %e, "notifier shutdown failed");
    }
    store.shutdown().await?;

    info!("taller serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

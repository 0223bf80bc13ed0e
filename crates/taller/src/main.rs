// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Taller - appointment booking and notification service for an auto-repair shop.
//!
//! This is the binary entry point.

mod agenda;
mod bootstrap;
mod probe;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taller_config::TallerConfig;
use taller_core::TemplateKind;

/// Taller - appointment booking and notification service.
#[derive(Parser, Debug)]
#[command(name = "taller", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Send one notification for a sample appointment through the configured channel.
    Probe {
        /// Template to render.
        #[arg(long, default_value = "confirmation")]
        kind: TemplateKind,
        /// Contact handle to address instead of the sample one.
        #[arg(long)]
        telefono: Option<String>,
    },
    /// Print appointments, optionally only those on one day.
    List {
        /// Calendar day, `YYYY-MM-DD`.
        #[arg(long)]
        fecha: Option<String>,
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> TallerConfig {
    let loaded = match path {
        Some(path) => taller_config::load_and_validate_path(path),
        None => taller_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            taller_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taller={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Probe { kind, telefono }) => {
            probe::run_probe(&config, kind, telefono).await
        }
        Some(Commands::List { fecha, json }) => {
            agenda::run_list(&config, fecha.as_deref(), json).await
        }
        None => {
            println!("taller: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

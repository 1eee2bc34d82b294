// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AirPrint bridge daemon.
//
// Entry point. Initialises logging, loads the config, starts the server and
// stops it again on Ctrl-C.

mod data_dir;

use std::path::Path;

use tracing::{error, info, warn};

use airprint_core::config::AppConfig;
use airprint_core::error::Result;
use airprint_server::AirPrintServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "AirPrint bridge starting");

    let config_path = data_dir::config_path();
    let config = load_config(&config_path)?;
    log_host_printers();

    let mut server = AirPrintServer::new(config);
    server.start().await?;
    info!(
        port = server.port(),
        uri = server.printer_uri().unwrap_or_default(),
        "AirPrint service running; press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C; shutting down");
    }

    server.stop().await?;
    info!(jobs = server.jobs().len(), "AirPrint bridge exited");
    Ok(())
}

/// Load the config, writing the defaults out on first run.
fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = AppConfig::load(path)?;
        info!(path = %path.display(), "loaded config");
        return Ok(config);
    }

    let config = AppConfig::default();
    match persist_config(&config, path) {
        Ok(()) => info!(path = %path.display(), "wrote default config"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not write default config"),
    }
    Ok(config)
}

fn persist_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    config.save(path)
}

fn log_host_printers() {
    match airprint_bridge::platform_printers().list_printers() {
        Ok(printers) if printers.is_empty() => warn!("no printers configured on this host"),
        Ok(printers) => {
            for printer in printers {
                info!(name = %printer.name, default = printer.is_default, status = %printer.status, "host printer");
            }
        }
        Err(e) => warn!(error = %e, "could not list host printers"),
    }
}

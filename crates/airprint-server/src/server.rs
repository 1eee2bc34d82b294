// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AirPrint server lifecycle.
//
// `start` resolves the address to advertise, binds the HTTP listener, serves
// it on a background task and then publishes the DNS-SD records.  `stop`
// withdraws the records and drains the listener for a bounded grace period.
// Callers must serialise start/stop.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use airprint_bridge::traits::{PrintDispatch, PrinterRegistry};
use airprint_core::config::AppConfig;
use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::ServerStatus;

use crate::discovery::{DiscoveryBackend, DiscoveryRegistrar, MdnsBackend, RESOURCE_PATH, ServiceAdvertisement};
use crate::http::{self, ServiceState};
use crate::jobs::JobRegistry;
use crate::net;
use crate::pipeline::ExecutionPipeline;

/// Network-facing AirPrint printer.
///
/// Created `Stopped`.  The job registry outlives restarts, so job ids keep
/// increasing across stop/start.
pub struct AirPrintServer {
    config: AppConfig,
    /// Bound port once started; kept across restarts when configured as 0.
    port: u16,
    status: ServerStatus,
    jobs: JobRegistry,
    printers: Arc<dyn PrinterRegistry>,
    dispatcher: Arc<dyn PrintDispatch>,
    registrar: DiscoveryRegistrar,
    printer_uri: Option<String>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl AirPrintServer {
    /// A server using the host print system and multicast DNS.
    pub fn new(config: AppConfig) -> Self {
        Self::with_backends(
            config,
            airprint_bridge::platform_printers(),
            airprint_bridge::platform_dispatch(),
            Box::new(MdnsBackend::new()),
        )
    }

    /// A server with explicit collaborators.
    pub fn with_backends(
        config: AppConfig,
        printers: Arc<dyn PrinterRegistry>,
        dispatcher: Arc<dyn PrintDispatch>,
        discovery: Box<dyn DiscoveryBackend>,
    ) -> Self {
        Self {
            port: config.server_port,
            config,
            status: ServerStatus::Stopped,
            jobs: JobRegistry::new(),
            printers,
            dispatcher,
            registrar: DiscoveryRegistrar::new(discovery),
            printer_uri: None,
            shutdown_tx: None,
            task_handle: None,
        }
    }

    /// The port this server will bind to (or is bound to).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    /// `printer-uri-supported` of the running server.
    pub fn printer_uri(&self) -> Option<&str> {
        self.printer_uri.as_deref()
    }

    pub fn is_advertised(&self) -> bool {
        self.registrar.is_active()
    }

    /// Start serving and advertising.  A running server is left alone.
    ///
    /// # Errors
    ///
    /// Fails if no local address can be determined, the port cannot be
    /// bound, or the primary DNS-SD record cannot be registered.  The server
    /// is `Stopped` afterwards in every failure case.
    pub async fn start(&mut self) -> Result<()> {
        if self.status == ServerStatus::Running {
            debug!(port = self.port, "AirPrint server already running");
            return Ok(());
        }

        self.status = ServerStatus::Starting;
        match self.try_start().await {
            Ok(()) => {
                self.status = ServerStatus::Running;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to start AirPrint server");
                self.status = ServerStatus::Stopped;
                Err(e)
            }
        }
    }

    async fn try_start(&mut self) -> Result<()> {
        let address = match self.config.advertise_address {
            Some(address) => address,
            None => net::resolve_local_ip()?,
        };

        let bind_addr: SocketAddr = ([0, 0, 0, 0], self.port).into();
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| AirPrintError::PrintServer(format!("bind {bind_addr}: {e}")))?;
        self.port = listener
            .local_addr()
            .map_err(|e| AirPrintError::PrintServer(format!("listener address: {e}")))?
            .port();

        let printer_name = self.advertised_printer_name().await;
        let printer_uri = printer_uri(address, self.port);
        info!(
            port = self.port,
            address = %address,
            printer = %printer_name,
            uri = %printer_uri,
            "AirPrint server listening"
        );

        let state = ServiceState {
            jobs: self.jobs.clone(),
            pipeline: ExecutionPipeline::new(self.jobs.clone(), Arc::clone(&self.dispatcher), self.config.spool_dir()),
            printers: Arc::clone(&self.printers),
            printer_uri: printer_uri.as_str().into(),
            printer_name: printer_name.as_str().into(),
        };
        let app = http::router(state, self.config.max_request_bytes);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let port = self.port;
        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            match served {
                Ok(()) => debug!(port, "HTTP listener drained"),
                Err(e) => error!(port, error = %e, "HTTP listener failed"),
            }
        });
        self.shutdown_tx = Some(shutdown_tx);
        self.task_handle = Some(handle);
        self.printer_uri = Some(printer_uri);

        let ad = ServiceAdvertisement::airprint(
            &printer_name,
            &self.config.hostname(),
            address,
            self.port,
            &self.config.printer_uuid,
        );
        if let Err(e) = self.registrar.activate(&ad) {
            self.shutdown_listener().await;
            return Err(e);
        }

        Ok(())
    }

    /// Withdraw the advertisement and close the listener.
    ///
    /// Safe to call repeatedly; stopping a stopped server does nothing.
    pub async fn stop(&mut self) -> Result<()> {
        self.registrar.deactivate();

        if self.status == ServerStatus::Stopped && self.task_handle.is_none() {
            return Ok(());
        }

        info!(port = self.port, "stopping AirPrint server");
        self.shutdown_listener().await;
        self.status = ServerStatus::Stopped;
        info!(port = self.port, "AirPrint server stopped");
        Ok(())
    }

    /// Signal graceful shutdown and abort the task after the grace period.
    async fn shutdown_listener(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.printer_uri = None;

        let Some(mut handle) = self.task_handle.take() else {
            return;
        };
        let grace = self.config.shutdown_grace();
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "HTTP listener task failed"),
            Err(_) => {
                warn!(grace_secs = grace.as_secs(), "connections still open after grace period; closing");
                handle.abort();
            }
        }
    }

    /// The host default printer, or the configured fallback.
    async fn advertised_printer_name(&self) -> String {
        let printers = Arc::clone(&self.printers);
        match tokio::task::spawn_blocking(move || printers.default_printer()).await {
            Ok(Ok(name)) if !name.trim().is_empty() => name,
            Ok(Ok(_)) => self.config.fallback_printer_name.clone(),
            Ok(Err(e)) => {
                debug!(error = %e, fallback = %self.config.fallback_printer_name, "no default printer to advertise");
                self.config.fallback_printer_name.clone()
            }
            Err(e) => {
                warn!(error = %e, "default printer lookup panicked");
                self.config.fallback_printer_name.clone()
            }
        }
    }
}

impl Drop for AirPrintServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// `ipp://<address>:<port>/ipp/print`.
pub fn printer_uri(address: IpAddr, port: u16) -> String {
    format!("ipp://{}/{RESOURCE_PATH}", SocketAddr::new(address, port))
}

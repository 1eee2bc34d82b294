// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host print system.

use std::path::Path;

use airprint_core::error::Result;
use airprint_core::types::PrinterInfo;

/// Read/write view of the host's print queues.
pub trait PrinterRegistry: Send + Sync {
    /// All queues the host knows about.
    fn list_printers(&self) -> Result<Vec<PrinterInfo>>;

    /// Name of the system default queue.
    ///
    /// Returns `AirPrintError::NoDefaultPrinter` when none is configured.
    fn default_printer(&self) -> Result<String>;

    /// Make `name` the system default queue.
    fn set_default(&self, name: &str) -> Result<()>;
}

/// Hands a spooled document to the OS spooler.
///
/// Implementations block until the spooler has accepted (or rejected) the
/// file; async callers must run them on a blocking thread.
pub trait PrintDispatch: Send + Sync {
    /// Print `file`.  An empty `printer` means the system default queue.
    fn dispatch(&self, file: &Path, printer: &str) -> Result<()>;
}

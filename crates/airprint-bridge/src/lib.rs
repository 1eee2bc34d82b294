// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host print-system bridges.
//
// The server only talks to the host through two capabilities: a printer
// registry (list / default / set default) and a print dispatcher (hand a
// spooled file to the OS spooler).  The implementation is picked once at
// startup for the target operating system.

use std::sync::Arc;

pub mod traits;

#[cfg(unix)]
pub mod cups;

#[cfg(not(unix))]
pub mod stub;

pub use traits::{PrintDispatch, PrinterRegistry};

/// Printer registry for the target operating system.
pub fn platform_printers() -> Arc<dyn PrinterRegistry> {
    #[cfg(unix)]
    {
        Arc::new(cups::CupsPrinters)
    }
    #[cfg(not(unix))]
    {
        Arc::new(stub::UnavailablePrinters)
    }
}

/// Print dispatcher for the target operating system.
pub fn platform_dispatch() -> Arc<dyn PrintDispatch> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(cups::CommandDispatch::lpr())
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Arc::new(cups::CommandDispatch::lp())
    }
    #[cfg(not(unix))]
    {
        Arc::new(stub::UnavailableDispatch)
    }
}

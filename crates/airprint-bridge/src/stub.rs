// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for platforms without a supported print system (Windows and
// anything else that is not Unix).
//
// Every method fails with `PlatformUnavailable`; the server still starts and
// answers IPP, but jobs end up aborted.

use std::path::Path;

use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::PrinterInfo;

use crate::traits::{PrintDispatch, PrinterRegistry};

pub struct UnavailablePrinters;

impl PrinterRegistry for UnavailablePrinters {
    fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        tracing::warn!("PrinterRegistry::list_printers called on stub bridge");
        Err(AirPrintError::PlatformUnavailable)
    }

    fn default_printer(&self) -> Result<String> {
        Err(AirPrintError::PlatformUnavailable)
    }

    fn set_default(&self, _name: &str) -> Result<()> {
        Err(AirPrintError::PlatformUnavailable)
    }
}

pub struct UnavailableDispatch;

impl PrintDispatch for UnavailableDispatch {
    fn dispatch(&self, _file: &Path, _printer: &str) -> Result<()> {
        tracing::warn!(os = std::env::consts::OS, "printing is not supported on this platform");
        Err(AirPrintError::PlatformUnavailable)
    }
}

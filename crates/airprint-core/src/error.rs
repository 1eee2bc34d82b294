// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the AirPrint bridge.

use thiserror::Error;

/// Top-level error type for all AirPrint bridge operations.
#[derive(Debug, Error)]
pub enum AirPrintError {
    // -- Network / advertisement --
    #[error("service discovery failed: {0}")]
    Discovery(String),

    #[error("could not resolve local network address: {0}")]
    AddressResolution(String),

    #[error("print server error: {0}")]
    PrintServer(String),

    // -- Protocol --
    #[error("malformed IPP request: {0}")]
    MalformedRequest(String),

    #[error("job id space exhausted")]
    JobIdsExhausted,

    // -- Host print system --
    #[error("print dispatch failed: {0}")]
    Dispatch(String),

    #[error("printer registry error: {0}")]
    PrinterRegistry(String),

    #[error("no default printer set")]
    NoDefaultPrinter,

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AirPrintError>;

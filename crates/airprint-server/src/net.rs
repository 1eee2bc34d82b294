// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local address discovery.

use std::net::{IpAddr, UdpSocket};

use airprint_core::error::{AirPrintError, Result};

/// Any routable address works; no packet is sent.
const PROBE_TARGET: &str = "8.8.8.8:80";

/// Address of the interface the host would use for outbound traffic.
///
/// Connecting a UDP socket only selects a route, so this works without
/// network access to the probe target, but fails when no route exists.
pub fn resolve_local_ip() -> Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .map_err(|e| AirPrintError::AddressResolution(format!("bind probe socket: {e}")))?;
    socket
        .connect(PROBE_TARGET)
        .map_err(|e| AirPrintError::AddressResolution(format!("no route to {PROBE_TARGET}: {e}")))?;
    let local = socket
        .local_addr()
        .map_err(|e| AirPrintError::AddressResolution(format!("probe socket address: {e}")))?;

    if local.ip().is_unspecified() {
        return Err(AirPrintError::AddressResolution("no outbound interface".into()));
    }
    Ok(local.ip())
}

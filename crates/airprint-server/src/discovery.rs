// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DNS-SD advertisement of the AirPrint printer.
//
// One printer is advertised per server instance, under `_ipp._tcp` and,
// where the responder and network allow it, the `_universal` subtype that
// iOS uses to find AirPrint printers.  Only the primary record is required;
// a failed subtype registration is logged and otherwise ignored.

use std::net::{IpAddr, SocketAddr};

use mdns_sd::{ServiceDaemon, ServiceInfo};
use tracing::{debug, info, warn};

use airprint_core::error::{AirPrintError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Primary service type.
pub const IPP_SERVICE_TYPE: &str = "_ipp._tcp";

/// AirPrint subtype of [`IPP_SERVICE_TYPE`].
pub const UNIVERSAL_SUBTYPE: &str = "_universal._sub._ipp._tcp";

pub const DISCOVERY_DOMAIN: &str = "local.";

/// Resource path clients print to, relative to the service root.
pub const RESOURCE_PATH: &str = "ipp/print";

/// Bonjour printer-type bitmask advertised in TXT.
const PRINTER_TYPE: &str = "0x809046";

const PDL: &str = "application/octet-stream,application/pdf,application/postscript,image/urf,image/jpeg,image/png";

const URF: &str = "W8,SRGB24,CP1,RS300-600,V1.4,DM1";

// ---------------------------------------------------------------------------
// Advertisement
// ---------------------------------------------------------------------------

/// Everything needed to publish one DNS-SD service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAdvertisement {
    /// `"<printer> @ <hostname>"`.
    pub instance_name: String,
    /// Service type without domain, e.g. `_ipp._tcp`.
    pub service_type: String,
    pub domain: String,
    /// Unqualified host name; `.local.` is appended on registration.
    pub hostname: String,
    pub address: IpAddr,
    pub port: u16,
    /// TXT key/value pairs, in publication order.
    pub txt: Vec<(String, String)>,
}

impl ServiceAdvertisement {
    /// Build the primary `_ipp._tcp` advertisement for `printer_name`.
    pub fn airprint(printer_name: &str, hostname: &str, address: IpAddr, port: u16, uuid: &str) -> Self {
        Self {
            instance_name: format!("{printer_name} @ {hostname}"),
            service_type: IPP_SERVICE_TYPE.into(),
            domain: DISCOVERY_DOMAIN.into(),
            hostname: hostname.into(),
            address,
            port,
            txt: airprint_txt_records(printer_name, address, port, uuid),
        }
    }

    /// Same instance, name, port and TXT under another service type.
    pub fn with_service_type(&self, service_type: &str) -> Self {
        Self {
            service_type: service_type.into(),
            ..self.clone()
        }
    }

    /// `<service_type>.<domain>`, the form mDNS responders expect.
    pub fn type_domain(&self) -> String {
        format!("{}.{}", self.service_type, self.domain)
    }

    pub fn host_fqdn(&self) -> String {
        format!("{}.{}", self.hostname, self.domain)
    }
}

/// The AirPrint TXT record set.
///
/// Key order and literal values match what iOS and macOS clients are known
/// to accept; change them only against a real device.
pub fn airprint_txt_records(printer_name: &str, address: IpAddr, port: u16, uuid: &str) -> Vec<(String, String)> {
    let admin_url = format!("http://{}/", SocketAddr::new(address, port));
    let product = format!("({printer_name})");

    [
        ("txtvers", "1"),
        ("qtotal", "1"),
        ("rp", RESOURCE_PATH),
        ("ty", printer_name),
        ("adminurl", admin_url.as_str()),
        ("note", ""),
        ("priority", "0"),
        ("product", product.as_str()),
        ("printer-state", "3"),
        ("printer-type", PRINTER_TYPE),
        ("pdl", PDL),
        ("URF", URF),
        ("UUID", uuid),
        ("Color", "T"),
        ("Duplex", "F"),
        ("Staple", "F"),
        ("Sort", "T"),
        ("Collate", "T"),
        ("Punch", "F"),
        ("Copies", "T"),
        ("Bind", "F"),
        ("PaperMax", "legal-A4"),
        ("Kind", "document,photo"),
        ("PaperCustom", "T"),
        ("air", "username,password"),
        ("mopria-certified", "1.3"),
        ("printer-location", ""),
        ("printer-make-and-model", printer_name),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// A DNS-SD responder capable of publishing service instances.
pub trait DiscoveryBackend: Send + Sync {
    /// Publish `ad`, returning the full service name used to withdraw it.
    fn register(&mut self, ad: &ServiceAdvertisement) -> Result<String>;

    /// Withdraw a previously registered service.
    fn unregister(&mut self, fullname: &str) -> Result<()>;

    /// Release responder resources.  Called on every deactivation.
    fn shutdown(&mut self);
}

/// Multicast DNS responder from `mdns-sd`.
///
/// The daemon thread is started on first registration and torn down on
/// shutdown, so an idle backend holds no sockets.
#[derive(Default)]
pub struct MdnsBackend {
    daemon: Option<ServiceDaemon>,
}

impl MdnsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn daemon(&mut self) -> Result<&ServiceDaemon> {
        if self.daemon.is_none() {
            let daemon = ServiceDaemon::new()
                .map_err(|e| AirPrintError::Discovery(format!("mDNS daemon: {e}")))?;
            self.daemon = Some(daemon);
        }
        self.daemon
            .as_ref()
            .ok_or_else(|| AirPrintError::Discovery("mDNS daemon unavailable".into()))
    }
}

impl DiscoveryBackend for MdnsBackend {
    fn register(&mut self, ad: &ServiceAdvertisement) -> Result<String> {
        let info = ServiceInfo::new(
            &ad.type_domain(),
            &ad.instance_name,
            &ad.host_fqdn(),
            ad.address,
            ad.port,
            &ad.txt[..],
        )
        .map_err(|e| AirPrintError::Discovery(format!("service info for {}: {e}", ad.type_domain())))?;

        let fullname = info.get_fullname().to_owned();
        self.daemon()?
            .register(info)
            .map_err(|e| AirPrintError::Discovery(format!("register {}: {e}", ad.type_domain())))?;
        Ok(fullname)
    }

    fn unregister(&mut self, fullname: &str) -> Result<()> {
        let Some(daemon) = self.daemon.as_ref() else {
            return Ok(());
        };
        daemon
            .unregister(fullname)
            .map(|_| ())
            .map_err(|e| AirPrintError::Discovery(format!("unregister {fullname}: {e}")))
    }

    fn shutdown(&mut self) {
        if let Some(daemon) = self.daemon.take() {
            if let Err(e) = daemon.shutdown() {
                warn!(error = %e, "failed to shut down mDNS daemon");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Registrar
// ---------------------------------------------------------------------------

/// Publishes and withdraws the printer's advertisement records.
pub struct DiscoveryRegistrar {
    backend: Box<dyn DiscoveryBackend>,
    registered: Vec<String>,
}

impl DiscoveryRegistrar {
    pub fn new(backend: Box<dyn DiscoveryBackend>) -> Self {
        Self {
            backend,
            registered: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.registered.is_empty()
    }

    /// Publish the primary record, then try the `_universal` subtype.
    ///
    /// # Errors
    ///
    /// Fails only if the primary registration fails; nothing stays
    /// registered in that case.
    pub fn activate(&mut self, ad: &ServiceAdvertisement) -> Result<()> {
        if self.is_active() {
            debug!("discovery already active");
            return Ok(());
        }

        let fullname = match self.backend.register(ad) {
            Ok(name) => name,
            Err(e) => {
                self.backend.shutdown();
                return Err(e);
            }
        };
        info!(
            name = %ad.instance_name,
            service_type = %ad.service_type,
            address = %ad.address,
            port = ad.port,
            "service registered"
        );
        self.registered.push(fullname);

        let universal = ad.with_service_type(UNIVERSAL_SUBTYPE);
        match self.backend.register(&universal) {
            Ok(name) => {
                info!(service_type = UNIVERSAL_SUBTYPE, "subtype registered");
                if !self.registered.contains(&name) {
                    self.registered.push(name);
                }
            }
            Err(e) => {
                warn!(error = %e, service_type = UNIVERSAL_SUBTYPE, "subtype registration failed; continuing without it");
            }
        }

        Ok(())
    }

    /// Withdraw every record.  Calling this while inactive is a no-op.
    pub fn deactivate(&mut self) {
        for fullname in self.registered.drain(..) {
            match self.backend.unregister(&fullname) {
                Ok(()) => info!(name = %fullname, "service unregistered"),
                Err(e) => warn!(error = %e, "failed to unregister service"),
            }
        }
        self.backend.shutdown();
    }
}

impl Drop for DiscoveryRegistrar {
    fn drop(&mut self) {
        if self.is_active() {
            self.deactivate();
        }
    }
}

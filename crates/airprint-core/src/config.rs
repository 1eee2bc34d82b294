// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default HTTP/IPP port.
pub const DEFAULT_PORT: u16 = 8082;

/// Name advertised when the host has no default printer.
pub const FALLBACK_PRINTER_NAME: &str = "AirPrint Service";

/// UUID published in the `UUID` TXT key unless overridden.
pub const DEFAULT_PRINTER_UUID: &str = "9c85edb1-1234-5678-9abc-123456789abc";

/// Persistent server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port for the HTTP listener.  `0` binds an ephemeral port.
    pub server_port: u16,
    /// Upper bound on an IPP request body.
    pub max_request_bytes: usize,
    /// How long `stop` waits for in-flight requests before forcing closure.
    pub shutdown_grace_secs: u64,
    /// Where job payloads are spooled before dispatch (default: OS temp dir).
    pub spool_dir: Option<PathBuf>,
    /// Host name used in the advertised instance name.
    pub hostname: Option<String>,
    /// Address to advertise instead of probing for the outbound interface.
    pub advertise_address: Option<IpAddr>,
    /// Printer name used when the host has no default printer.
    pub fallback_printer_name: String,
    /// Value of the `UUID` TXT key.
    pub printer_uuid: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            max_request_bytes: 64 * 1024 * 1024,
            shutdown_grace_secs: 5,
            spool_dir: None,
            hostname: None,
            advertise_address: None,
            fallback_printer_name: FALLBACK_PRINTER_NAME.into(),
            printer_uuid: DEFAULT_PRINTER_UUID.into(),
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file.  A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Directory for spooled job payloads.
    pub fn spool_dir(&self) -> PathBuf {
        self.spool_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Host name for the advertised instance name.
    ///
    /// The configured value wins, then the kernel host name, then the
    /// `HOSTNAME` / `COMPUTERNAME` environment variables, then `"airprint"`.
    pub fn hostname(&self) -> String {
        resolve_hostname(
            self.hostname.as_deref(),
            gethostname::gethostname().into_string().ok(),
            |key| std::env::var(key).ok(),
        )
    }
}

fn resolve_hostname(
    configured: Option<&str>,
    system: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> String {
    configured
        .map(str::to_owned)
        .into_iter()
        .chain(system.as_deref().map(host_label))
        .chain(env("HOSTNAME"))
        .chain(env("COMPUTERNAME"))
        .map(|h| h.trim().to_owned())
        .find(|h| !h.is_empty())
        .unwrap_or_else(|| "airprint".into())
}

// Some hosts report an FQDN; the instance name only wants the first label.
fn host_label(name: &str) -> String {
    name.trim().split('.').next().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_8082() {
        assert_eq!(AppConfig::default().server_port, 8082);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "server_port": 9100, "hostname": "office" }"#).unwrap();

        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server_port, 9100);
        assert_eq!(cfg.hostname(), "office");
        assert_eq!(cfg.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(cfg.fallback_printer_name, FALLBACK_PRINTER_NAME);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = AppConfig {
            server_port: 631,
            advertise_address: Some("10.0.0.5".parse().unwrap()),
            ..AppConfig::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn kernel_host_name_is_used_without_environment() {
        assert_eq!(resolve_hostname(None, Some("studio".into()), no_env), "studio");
    }

    #[test]
    fn kernel_host_name_beats_environment() {
        let env = |key: &str| (key == "HOSTNAME").then(|| "container".to_owned());
        assert_eq!(resolve_hostname(None, Some("studio".into()), env), "studio");
        assert_eq!(resolve_hostname(None, None, env), "container");
    }

    #[test]
    fn fqdn_is_cut_to_first_label() {
        assert_eq!(resolve_hostname(None, Some("studio.example.org".into()), no_env), "studio");
        assert_eq!(resolve_hostname(None, Some("studio.local".into()), no_env), "studio");
    }

    #[test]
    fn configured_host_name_wins() {
        let env = |_: &str| Some("container".to_owned());
        assert_eq!(resolve_hostname(Some("office"), Some("studio".into()), env), "office");
    }

    #[test]
    fn blank_sources_are_skipped() {
        let env = |key: &str| (key == "COMPUTERNAME").then(|| "DESKTOP-1".to_owned());
        assert_eq!(resolve_hostname(Some("  "), Some("".into()), env), "DESKTOP-1");
        assert_eq!(resolve_hostname(None, None, no_env), "airprint");
    }

    #[test]
    fn default_config_reports_the_kernel_host_name() {
        let kernel = gethostname::gethostname().into_string().unwrap_or_default();
        let label = kernel.trim().split('.').next().unwrap_or_default();
        if !label.is_empty() {
            assert_eq!(AppConfig::default().hostname(), label);
        }
    }
}

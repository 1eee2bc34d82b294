// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS bridge for macOS and Linux.
//
// Queue enumeration shells out to `lpstat`, default selection to
// `lpoptions`, and printing to `lpr` (macOS) or `lp` (Linux).  `lpstat`
// output is localised, so the parsers accept both the English and the
// Simplified Chinese message formats.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::PrinterInfo;

use crate::traits::{PrintDispatch, PrinterRegistry};

/// Printer registry backed by the CUPS command-line tools.
pub struct CupsPrinters;

impl PrinterRegistry for CupsPrinters {
    fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        // A missing default is not an error when listing.
        let default = self.default_printer().ok();
        let output = run_capture("lpstat", &["-p"])
            .map_err(|e| AirPrintError::PrinterRegistry(format!("lpstat -p: {e}")))?;
        let printers = parse_printer_list(&output, default.as_deref());
        debug!(count = printers.len(), "enumerated CUPS printers");
        Ok(printers)
    }

    fn default_printer(&self) -> Result<String> {
        let output = run_capture("lpstat", &["-d"])
            .map_err(|e| AirPrintError::PrinterRegistry(format!("lpstat -d: {e}")))?;
        parse_default_printer(&output)
    }

    fn set_default(&self, name: &str) -> Result<()> {
        run_capture("lpoptions", &["-d", name])
            .map_err(|e| AirPrintError::PrinterRegistry(format!("lpoptions -d {name}: {e}")))?;
        info!(printer = name, "default printer changed");
        Ok(())
    }
}

/// Dispatches files through a CUPS client command.
pub struct CommandDispatch {
    program: &'static str,
    printer_flag: &'static str,
}

impl CommandDispatch {
    /// BSD-style `lpr [-P printer] file` (macOS).
    pub fn lpr() -> Self {
        Self {
            program: "lpr",
            printer_flag: "-P",
        }
    }

    /// System V-style `lp [-d printer] file` (Linux).
    pub fn lp() -> Self {
        Self {
            program: "lp",
            printer_flag: "-d",
        }
    }

    fn args(&self, file: &Path, printer: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(3);
        if !printer.is_empty() {
            args.push(self.printer_flag.to_owned());
            args.push(printer.to_owned());
        }
        args.push(file.display().to_string());
        args
    }
}

impl PrintDispatch for CommandDispatch {
    fn dispatch(&self, file: &Path, printer: &str) -> Result<()> {
        let args = self.args(file, printer);
        info!(program = self.program, args = ?args, "invoking print command");

        let output = Command::new(self.program)
            .args(&args)
            .output()
            .map_err(|e| AirPrintError::Dispatch(format!("spawn {}: {e}", self.program)))?;

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if !output.status.success() {
            return Err(AirPrintError::Dispatch(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                combined.trim()
            )));
        }

        debug!(program = self.program, output = %combined.trim(), "print command succeeded");
        Ok(())
    }
}

/// Run a command and return its stdout, failing on a non-zero exit.
fn run_capture(program: &str, args: &[&str]) -> std::io::Result<String> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `lpstat -p` output into printer records.
///
/// Accepts `printer NAME is idle...` and the localised
/// `打印机NAME闲置...` form, where the name runs until the first character
/// outside `[A-Za-z0-9_-]`.
pub fn parse_printer_list(output: &str, default: Option<&str>) -> Vec<PrinterInfo> {
    output
        .lines()
        .map(str::trim)
        .filter_map(printer_name_from_line)
        .map(|name| PrinterInfo {
            description: name.clone(),
            is_default: default == Some(name.as_str()),
            status: "Available".into(),
            name,
        })
        .collect()
}

fn printer_name_from_line(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix("printer ") {
        return rest.split_whitespace().next().map(str::to_owned);
    }
    let rest = line.strip_prefix("打印机")?;
    let end = rest
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let name = if end == 0 { rest } else { &rest[..end] };
    (!name.is_empty()).then(|| name.to_owned())
}

/// Parse `lpstat -d` output.
///
/// `system default destination: NAME` (or the localised form with a
/// full-width colon).  "no system default destination" maps to
/// `NoDefaultPrinter`.
pub fn parse_default_printer(output: &str) -> Result<String> {
    let line = output.trim();
    if line.is_empty() || line.contains("no system default destination") {
        return Err(AirPrintError::NoDefaultPrinter);
    }

    let name = [':', '：']
        .iter()
        .find_map(|sep| {
            let mut parts = line.split(*sep);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(_), Some(name), None) => Some(name.trim()),
                _ => None,
            }
        })
        .filter(|name| !name.is_empty());

    name.map(str::to_owned).ok_or_else(|| {
        AirPrintError::PrinterRegistry(format!("failed to parse default printer: {line}"))
    })
}

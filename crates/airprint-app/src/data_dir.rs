// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file location.

use std::path::PathBuf;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "AIRPRINT_CONFIG";

/// Path of the config file: `$AIRPRINT_CONFIG`, else
/// `<data dir>/airprint/config.json`.
pub fn config_path() -> PathBuf {
    config_path_from(|key| std::env::var(key).ok())
}

fn config_path_from(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    data_dir_from(&env).join("airprint").join("config.json")
}

fn data_dir_from(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    // XDG data dir, then ~/.local/share, then %APPDATA%
    if let Some(xdg) = env("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Some(home) = env("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    if let Some(appdata) = env("APPDATA") {
        return PathBuf::from(appdata);
    }
    std::env::temp_dir()
}

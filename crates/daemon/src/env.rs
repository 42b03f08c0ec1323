// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;

/// Resolve the configuration document path: `SV_CONFIG_PATH` if set, else
/// `/etc/sv-daemon/config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("SV_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/sv-daemon/config.toml"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

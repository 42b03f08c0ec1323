// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sv-config: loads the TOML configuration document (spec §6) into
//! [`sv_core::ResolvedConfig`].
//!
//! This is *not* the integrity-checking loader or `{placeholder}`
//! template resolver spec §1 names as external collaborators — it only
//! parses already-resolved TOML into typed structs, the way
//! `oddjobs/crates/runbook`'s loader parses an already-resolved runbook
//! document rather than doing variable substitution itself.

use std::path::Path;
use sv_core::ResolvedConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("configuration is invalid: {0}")]
    Invalid(String),
}

/// Load and validate the configuration document at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<ResolvedConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text, &path.display().to_string())
}

/// Parse an already-read TOML document. Exposed separately from [`load`]
/// so callers that already have the text in hand (daemon reload, tests)
/// don't need a filesystem round trip.
pub fn parse(text: &str, source_name: &str) -> Result<ResolvedConfig, ConfigError> {
    let config: ResolvedConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: source_name.to_string(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Cross-reference checks TOML's own schema can't express: every sensor's
/// `alert` must name a configured alert, every mode's sensor list must
/// name configured sensors, and mode codes must be unique (spec §3
/// invariants).
fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    let alert_names: std::collections::HashSet<_> = config.alerts.alerts.iter().map(|a| &a.name).collect();
    for sensor in &config.sensors {
        if !alert_names.contains(&sensor.alert) {
            return Err(ConfigError::Invalid(format!(
                "sensor `{}` references unknown alert `{}`",
                sensor.name, sensor.alert
            )));
        }
    }

    let sensor_names: std::collections::HashSet<_> = config.sensors.iter().map(|s| &s.name).collect();
    for mode in &config.modes.modes {
        for sensor in &mode.sensor_names {
            if !sensor_names.contains(sensor) {
                return Err(ConfigError::Invalid(format!(
                    "mode `{}` references unknown sensor `{}`",
                    mode.name, sensor
                )));
            }
        }
    }

    let mut seen_codes = std::collections::HashSet::new();
    for mode in &config.modes.modes {
        if !seen_codes.insert(mode.code) {
            return Err(ConfigError::Invalid(format!("mode code {} is bound to more than one mode", mode.code)));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resolved configuration tree (spec §6 "Configuration document").
//!
//! This is *not* the integrity-checking loader or the `{placeholder}`
//! template resolver named in spec §1 as external collaborators: it only
//! defines the already-resolved shape the engine consumes. `sv-config`
//! parses TOML into these types.

use crate::event::EventBinding;
use crate::mode::ModeConfig;
use crate::name::ObjectId;
use crate::{AlertConfig, SensorConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    pub mode_object: ObjectId,
    pub modes: Vec<ModeConfig>,
    #[serde(default)]
    pub repository_bindings: Vec<EventBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub alerts: Vec<AlertConfig>,
    #[serde(default)]
    pub repository_bindings: Vec<EventBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub services: ServicesConfig,
    pub modes: ModesConfig,
    pub alerts: AlertsConfig,
    pub sensors: Vec<SensorConfig>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mode-dependent numeric values (spec §3 MDV): a per-mode override map plus
//! a mandatory default, used for activation delay, prealert duration, and
//! alert duration.

use crate::name::ModeName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDependentValue {
    #[serde(default)]
    per_mode: HashMap<ModeName, f64>,
    default: f64,
}

impl ModeDependentValue {
    pub fn new(default: f64) -> Self {
        Self {
            per_mode: HashMap::new(),
            default,
        }
    }

    pub fn with_override(mut self, mode: impl Into<ModeName>, value: f64) -> Self {
        self.per_mode.insert(mode.into(), value);
        self
    }

    /// The mode-specific value if present, otherwise the default.
    pub fn for_mode(&self, mode: &ModeName) -> f64 {
        *self.per_mode.get(mode).unwrap_or(&self.default)
    }

    pub fn duration_for_mode(&self, mode: &ModeName) -> Duration {
        Duration::from_secs_f64(self.for_mode(mode).max(0.0))
    }
}

#[cfg(test)]
#[path = "mdv_tests.rs"]
mod tests;

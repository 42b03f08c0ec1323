// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-tier error taxonomy of spec §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown context-handler name, malformed action descriptor, or a
    /// reference to a missing alert/sensor. The offending action is
    /// skipped; the engine keeps running.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A read/write to LKD failed. Not retried; the next callback re-syncs.
    #[error("bus I/O error: {0}")]
    BusIo(String),

    /// A defensive check caught a status transition not covered by the
    /// spec §4.3 table. No recovery is attempted; the engine does not crash.
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),

    /// Lock-acquisition cycle, missing invariant, or other programming
    /// error. Fatal to the offending task only.
    #[error("programming error: {0}")]
    Programming(String),
}

impl EngineError {
    /// Whether this error should be treated as fatal to the task that
    /// raised it (spec §7 tier 4) rather than merely logged and skipped.
    pub fn is_fatal_to_task(&self) -> bool {
        matches!(self, EngineError::Programming(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

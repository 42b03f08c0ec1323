// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activation criterion evaluator (spec §4.2, component 6): a boolean
//! combinator over sensor-triggered predicates, gating whether a sensor's
//! activation timer is allowed to progress.

use crate::name::SensorName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationCriterion {
    /// Leaf: sensor `sensor` must currently be triggered (or not, if
    /// `triggered` is false).
    Sensor { sensor: SensorName, triggered: bool },
    And { children: Vec<ActivationCriterion> },
    Or { children: Vec<ActivationCriterion> },
}

impl ActivationCriterion {
    /// Evaluate against a lookup of current sensor trigger state. A sensor
    /// referenced here that is disabled still reports its last-observed
    /// trigger state (spec §9 open question 2) — the lookup closure is
    /// responsible for that, not this evaluator.
    pub fn evaluate(&self, is_triggered: &dyn Fn(&SensorName) -> bool) -> bool {
        match self {
            ActivationCriterion::Sensor { sensor, triggered } => is_triggered(sensor) == *triggered,
            ActivationCriterion::And { children } => {
                children.iter().all(|c| c.evaluate(is_triggered))
            }
            ActivationCriterion::Or { children } => {
                children.iter().any(|c| c.evaluate(is_triggered))
            }
        }
    }
}

#[cfg(test)]
#[path = "criterion_tests.rs"]
mod tests;

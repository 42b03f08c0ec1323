// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sensor configuration (spec §3 "Sensor").
//!
//! Boolean and float sensors differ only in how they recompute trigger
//! state (spec §9 design note "polymorphism over sensor kind"), so they
//! share one struct with a tagged `kind` rather than an inheritance chain.

use crate::criterion::ActivationCriterion;
use crate::mdv::ModeDependentValue;
use crate::name::{AlertName, ObjectId, SensorName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorKind {
    Boolean {
        /// Which polarity of `watched` counts as triggered.
        trigger_value: bool,
    },
    Float {
        lower: Option<f64>,
        upper: Option<f64>,
        hysteresis: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: SensorName,
    pub alert: AlertName,
    pub kind: SensorKind,
    pub enabled_object: ObjectId,
    pub watched_object: ObjectId,
    pub persistence_object: Option<ObjectId>,
    pub activation_delay: ModeDependentValue,
    pub prealert_duration: ModeDependentValue,
    pub alert_duration: ModeDependentValue,
    pub activation_criterion: Option<ActivationCriterion>,
    pub description: Option<String>,
}

crate::builder! {
    pub struct SensorConfigBuilder => SensorConfig {
        into {
            name: SensorName = "sensor",
            alert: AlertName = "alert",
            enabled_object: ObjectId = "enabled",
            watched_object: ObjectId = "watched"
        }
        set {
            kind: SensorKind = SensorKind::Boolean { trigger_value: true },
            activation_delay: ModeDependentValue = ModeDependentValue::new(0.0),
            prealert_duration: ModeDependentValue = ModeDependentValue::new(0.0),
            alert_duration: ModeDependentValue = ModeDependentValue::new(0.0)
        }
        option {
            persistence_object: ObjectId = None,
            activation_criterion: ActivationCriterion = None,
            description: String = None
        }
    }
}

#[cfg(test)]
#[path = "sensor_tests.rs"]
mod tests;

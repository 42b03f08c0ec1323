// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side effects produced by the alert/sensor/mode state machines.
//!
//! Per spec §5, the state machine must not call back into bus I/O or event
//! dispatch while holding an alert-lock: transitions instead *record*
//! effects, the lock is released, and an executor carries them out. This
//! mirrors the teacher's `Effect`-queue architecture (`oddjobs`'s
//! `engine::executor`), generalised to the bus-object/action/event effects
//! this domain needs instead of shell/tmux effects.

use crate::action::ActionDescriptor;
use crate::event::{EventContext, EventKind};
use crate::name::{ObjectId, SensorName};
use crate::value::ObjectValue;
use std::time::Duration;

/// Which timer an effect targets. Each sensor owns at most one timer of
/// each kind at a time (spec §4.1, §4.2, §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    Activation(SensorName),
    Prealert(SensorName),
    Alert(SensorName),
}

#[derive(Debug, Clone)]
pub enum Effect {
    SetTimer {
        owner: TimerOwner,
        duration: Duration,
    },
    CancelTimer {
        owner: TimerOwner,
    },
    WriteObject {
        object: ObjectId,
        value: ObjectValue,
    },
    ExecuteAction {
        action: ActionDescriptor,
    },
    Emit {
        event: EventKind,
        context: EventContext,
    },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::WriteObject { .. } => "write_object",
            Effect::ExecuteAction { .. } => "execute_action",
            Effect::Emit { .. } => "emit",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;

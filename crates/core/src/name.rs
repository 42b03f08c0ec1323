// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unique string names for domain entities (spec §3).
//!
//! Sensors, alerts, modes, and bus objects are identified by user-given
//! unique names rather than generated ids, so each gets a thin newtype over
//! [`SmolStr`] instead of a generated-id scheme.

use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

macro_rules! define_name {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(SmolStr);

        impl $name {
            pub fn new(s: impl Into<SmolStr>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

define_name!(
    /// Unique name of a sensor.
    pub struct SensorName;
);

define_name!(
    /// Unique name of an alert.
    pub struct AlertName;
);

define_name!(
    /// Unique name of an operating mode.
    pub struct ModeName;
);

define_name!(
    /// Identifier of an LKD bus object.
    pub struct ObjectId;
);

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;

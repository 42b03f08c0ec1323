// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action descriptors (spec §4.5, component 4): what the action executor
//! translates into LKD command(s). `send-email`/`send-sms`/`shell-cmd` are
//! specialised; any other `type` is forwarded verbatim as `Generic`,
//! matching `original_source/homewatcher`'s catch-all `LinknxAction`.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEmailAction {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendSmsAction {
    pub to: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellCmdAction {
    pub command: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionDescriptor {
    SendEmail(SendEmailAction),
    SendSms(SendSmsAction),
    ShellCmd(ShellCmdAction),
    /// Any other action `type`, forwarded to LKD unchanged.
    Generic(Value),
}

impl ActionDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionDescriptor::SendEmail(_) => "send-email",
            ActionDescriptor::SendSms(_) => "send-sms",
            ActionDescriptor::ShellCmd(_) => "shell-cmd",
            ActionDescriptor::Generic(_) => "generic",
        }
    }
}

impl Serialize for ActionDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut value = match self {
            ActionDescriptor::SendEmail(a) => serde_json::to_value(a),
            ActionDescriptor::SendSms(a) => serde_json::to_value(a),
            ActionDescriptor::ShellCmd(a) => serde_json::to_value(a),
            ActionDescriptor::Generic(v) => return v.serialize(serializer),
        }
        .map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::String(self.kind().to_string()));
        }
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActionDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("send-email") => serde_json::from_value(value)
                .map(ActionDescriptor::SendEmail)
                .map_err(D::Error::custom),
            Some("send-sms") => serde_json::from_value(value)
                .map(ActionDescriptor::SendSms)
                .map_err(D::Error::custom),
            Some("shell-cmd") => serde_json::from_value(value)
                .map(ActionDescriptor::ShellCmd)
                .map_err(D::Error::custom),
            _ => Ok(ActionDescriptor::Generic(value)),
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action executor (spec §4.5, component 4): the last step before an
//! already-templated [`ActionDescriptor`] reaches LKD. `send-email`
//! documents get a trailer identifying the sending daemon appended to the
//! body; everything else passes through unchanged to
//! [`sv_bus::BusClient::execute_action`].

use chrono::Utc;
use sv_bus::{BusClient, BusError};
use sv_core::{ActionDescriptor, SendEmailAction};

const PRODUCT_NAME: &str = "sv-daemon";

fn with_trailer(action: SendEmailAction) -> SendEmailAction {
    let trailer = format!(
        "\n\n--\nSent by {PRODUCT_NAME} v{} at {}",
        env!("CARGO_PKG_VERSION"),
        Utc::now().to_rfc3339()
    );
    SendEmailAction {
        body: action.body + &trailer,
        ..action
    }
}

pub async fn execute(bus: &dyn BusClient, action: ActionDescriptor) -> Result<(), BusError> {
    let action = match action {
        ActionDescriptor::SendEmail(a) => ActionDescriptor::SendEmail(with_trailer(a)),
        other => other,
    };
    bus.execute_action(&action).await
}

#[cfg(test)]
#[path = "action_executor_tests.rs"]
mod tests;

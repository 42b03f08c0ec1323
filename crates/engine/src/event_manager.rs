// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event manager (spec §4.5, component 3): fires configured event bindings
//! and expands the named context-handler placeholders embedded in action
//! templates. Distinct from, and unrelated to, the config-ingestion
//! `{placeholder}` resolver that spec §1's Non-goals excludes — these
//! placeholders are resolved per firing, not once at config load.
//!
//! Unrecognised handler names are a configuration error: the offending
//! action is skipped and logged, the rest of the binding's actions still
//! fire (spec §7 "errors degrade gracefully, they do not crash the
//! engine").

use sv_core::{ActionDescriptor, EngineError, EventBinding, EventContext, EventKind, SendEmailAction, SendSmsAction, ShellCmdAction};
use tracing::warn;

/// Resolve every `{handler}` token in `template` against `ctx`. Returns an
/// error naming the first unrecognised handler encountered.
fn expand(template: &str, ctx: &EventContext) -> Result<String, EngineError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            out.push_str(rest);
            return Ok(out);
        };
        out.push_str(&rest[..open]);
        let token = &rest[open + 1..open + close];
        out.push_str(&resolve_handler(token, ctx)?);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve_handler(token: &str, ctx: &EventContext) -> Result<String, EngineError> {
    let (name, arg) = match token.split_once('(') {
        Some((name, rest)) => (name, rest.strip_suffix(')').unwrap_or(rest)),
        None => (token, ""),
    };
    match name {
        "alert.name" => Ok(ctx.alert.as_ref().map(|a| a.as_str().to_string()).unwrap_or_default()),
        "mode.current" => Ok(ctx.mode.as_ref().map(|m| m.as_str().to_string()).unwrap_or_default()),
        "alert.sensors-status" => Ok(sensors_status(ctx, arg)),
        "mode.enabled-sensors" => Ok(enabled_sensors(ctx, arg)),
        other => Err(EngineError::Configuration(format!("unknown context handler `{other}`"))),
    }
}

/// `{alert.sensors-status}` — bulleted list of sensors in prealert/alert/
/// pause for the firing alert. A parenthesised class filter
/// (`prealert`, `alert`, `pause`) narrows which classes are listed; an
/// `inline` flag joins with commas instead of newlined bullets.
fn sensors_status(ctx: &EventContext, arg: &str) -> String {
    let classes: Vec<&str> = arg.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    let inline = classes.contains(&"inline");
    let want = |class: &str| classes.is_empty() || classes.contains(&class) || inline && classes.len() == 1 && classes[0] == "inline";
    let want_all = classes.is_empty() || (classes.len() == 1 && classes[0] == "inline");

    let mut lines = Vec::new();
    if want_all || want("prealert") {
        lines.extend(ctx.sensors_in_prealert.iter().map(|s| format!("{s} (prealert)")));
    }
    if want_all || want("alert") {
        lines.extend(ctx.sensors_in_alert.iter().map(|s| format!("{s} (alert)")));
    }
    if want_all || want("pause") {
        lines.extend(ctx.sensors_in_pause.iter().map(|s| format!("{s} (paused)")));
    }

    if inline {
        lines.join(", ")
    } else {
        lines.iter().map(|l| format!("- {l}")).collect::<Vec<_>>().join("\n")
    }
}

/// `{mode.enabled-sensors}` — sorted list of sensors currently enabled.
/// `(pending)` additionally includes sensors mid-activation-delay.
fn enabled_sensors(ctx: &EventContext, arg: &str) -> String {
    let mut names: Vec<String> = ctx.enabled_sensors.iter().map(|s| s.as_str().to_string()).collect();
    if arg.trim() == "pending" {
        names.extend(ctx.pending_activation_sensors.iter().map(|s| s.as_str().to_string()));
    }
    names.sort();
    names.dedup();
    names.join(", ")
}

fn expand_action(action: &ActionDescriptor, ctx: &EventContext) -> Result<ActionDescriptor, EngineError> {
    Ok(match action {
        ActionDescriptor::SendEmail(a) => ActionDescriptor::SendEmail(SendEmailAction {
            to: a.to.clone(),
            subject: expand(&a.subject, ctx)?,
            body: expand(&a.body, ctx)?,
        }),
        ActionDescriptor::SendSms(a) => ActionDescriptor::SendSms(SendSmsAction {
            to: a.to.clone(),
            text: expand(&a.text, ctx)?,
        }),
        ActionDescriptor::ShellCmd(a) => ActionDescriptor::ShellCmd(ShellCmdAction {
            command: expand(&a.command, ctx)?,
        }),
        ActionDescriptor::Generic(v) => ActionDescriptor::Generic(v.clone()),
    })
}

/// Resolves the action list to execute for a fired event: the entity's own
/// bindings for this `kind`, followed by the repository-wide bindings for
/// the same `kind`, each with its templates expanded against `ctx`.
/// Actions whose templates reference an unknown handler are dropped and
/// logged; the rest of the list still fires.
pub fn actions_for(
    kind: EventKind,
    entity_bindings: &[EventBinding],
    repository_bindings: &[EventBinding],
    ctx: &EventContext,
) -> Vec<ActionDescriptor> {
    entity_bindings
        .iter()
        .chain(repository_bindings.iter())
        .filter(|b| b.event == kind)
        .flat_map(|b| &b.actions)
        .filter_map(|action| match expand_action(action, ctx) {
            Ok(expanded) => Some(expanded),
            Err(err) => {
                warn!(event = ?kind, action = action.kind(), error = %err, "dropping action with unresolved context handler");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "event_manager_tests.rs"]
mod tests;

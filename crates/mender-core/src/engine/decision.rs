//! Parsing of the engine's JSON responses.

use serde_json::{Map, Value};

use crate::{
    error::{MenderError, Result},
    models::{RepairAction, RepairDecision},
};

/// Removes ```` ```json ```` and ```` ``` ```` decorations and surrounding
/// whitespace.
pub fn strip_decorations(response: &str) -> String {
    response
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parses `{"commands": ["...", ...]}`.
///
/// # Errors
///
/// Returns `MenderError::MalformedResponse` if the response is not a JSON
/// object or lacks a `commands` array of strings.
pub fn parse_commands(response: &str) -> Result<Vec<String>> {
    let object = parse_object("commands", response)?;
    let commands = object
        .get("commands")
        .and_then(Value::as_array)
        .ok_or_else(|| MenderError::malformed("commands", "missing 'commands' array"))?;

    commands
        .iter()
        .map(|command| {
            command
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| MenderError::malformed("commands", format!("non-string command {command}")))
        })
        .collect()
}

/// Parses a repair decision.
///
/// `action` must be `rerun` (or its alias `command`) with a non-empty
/// `command`, or `patch`. `rationale` falls back to `response`.
///
/// ```rust
/// use mender_core::{engine::decision::parse_repair_decision, models::RepairAction};
///
/// let decision = parse_repair_decision(
///     "```json\n{\"action\": \"command\", \"command\": \"pip install foo && pytest\", \"response\": \"install foo\"}\n```",
/// )
/// .unwrap();
/// assert_eq!(
///     decision.action,
///     RepairAction::Rerun { command: "pip install foo && pytest".to_string() }
/// );
/// assert_eq!(decision.rationale.as_deref(), Some("install foo"));
/// ```
///
/// # Errors
///
/// Returns `MenderError::MalformedResponse` for invalid JSON, a missing or
/// unknown action, or a rerun without a command.
pub fn parse_repair_decision(response: &str) -> Result<RepairDecision> {
    let object = parse_object("repair", response)?;
    let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::trim);

    let action = match text("action").map(str::to_lowercase).as_deref() {
        Some("rerun" | "command") => {
            let command = text("command")
                .filter(|command| !command.is_empty())
                .ok_or_else(|| MenderError::malformed("repair", "rerun decision without a command"))?;
            RepairAction::Rerun {
                command: command.to_string(),
            }
        }
        Some("patch") => RepairAction::Patch,
        Some(other) => {
            return Err(MenderError::malformed(
                "repair",
                format!("unknown action '{other}'"),
            ))
        }
        None => return Err(MenderError::malformed("repair", "missing 'action'")),
    };

    let rationale = text("rationale")
        .or_else(|| text("response"))
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    Ok(RepairDecision { action, rationale })
}

fn parse_object(stage: &'static str, response: &str) -> Result<Map<String, Value>> {
    let stripped = strip_decorations(response);
    match serde_json::from_str::<Value>(&stripped) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MenderError::malformed(stage, "expected a JSON object")),
        Err(e) => Err(MenderError::malformed(stage, format!("invalid JSON: {e}"))),
    }
}

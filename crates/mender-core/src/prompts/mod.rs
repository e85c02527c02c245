//! Prompt templates with `{name}` placeholders.
//!
//! Templates are embedded at compile time from `assets/prompts/`. Rendering is
//! a single left-to-right pass, so substituted values are never re-scanned
//! and may safely contain braces (JSON, code).

use std::collections::HashMap;

/// A named prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    name: &'static str,
    body: &'static str,
}

/// Initial plan from an intent and a snapshot.
pub const PLAN: PromptTemplate = PromptTemplate::new("plan", include_str!("../../assets/prompts/plan.txt"));

/// Remediation plan from an intent, a failure and a snapshot.
pub const RERUN_PLAN: PromptTemplate =
    PromptTemplate::new("rerun_plan", include_str!("../../assets/prompts/rerun_plan.txt"));

/// File blocks for one plan step.
pub const CODE: PromptTemplate = PromptTemplate::new("code", include_str!("../../assets/prompts/code.txt"));

/// Fixes the shape of a malformed file-block response.
pub const REFORMAT: PromptTemplate =
    PromptTemplate::new("reformat", include_str!("../../assets/prompts/reformat.txt"));

/// JSON command list for a freshly implemented plan.
pub const COMMANDS: PromptTemplate =
    PromptTemplate::new("commands", include_str!("../../assets/prompts/commands.txt"));

/// JSON repair decision for a failing command.
pub const REPAIR: PromptTemplate = PromptTemplate::new("repair", include_str!("../../assets/prompts/repair.txt"));

impl PromptTemplate {
    pub const fn new(name: &'static str, body: &'static str) -> Self {
        Self { name, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitutes every `{key}` whose key appears in `vars`.
    ///
    /// Placeholders without a value, and brace groups that are not plain
    /// identifiers, are left untouched.
    ///
    /// ```rust
    /// use mender_core::prompts::PromptTemplate;
    ///
    /// let template = PromptTemplate::new("demo", "Hello {who}, keep {\"json\": 1} and {missing}");
    /// assert_eq!(
    ///     template.render(&[("who", "{world}")]),
    ///     "Hello {world}, keep {\"json\": 1} and {missing}"
    /// );
    /// ```
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let values: HashMap<&str, &str> = vars.iter().copied().collect();
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let key_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let key = &after[..key_len];

            match values.get(key) {
                Some(value) if !key.is_empty() && after[key_len..].starts_with('}') => {
                    out.push_str(value);
                    rest = &after[key_len + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Renders a command list as a numbered listing.
pub(crate) fn numbered(commands: &[String]) -> String {
    if commands.is_empty() {
        return "(none)".to_string();
    }
    commands
        .iter()
        .enumerate()
        .map(|(i, command)| format!("{}. {command}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Placeholder text for empty values so templates never show a blank hole.
pub(crate) fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "(none)"
    } else {
        value
    }
}

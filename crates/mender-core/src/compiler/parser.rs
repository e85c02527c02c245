//! Line-oriented parser for plan responses.

use thiserror::Error;

use crate::models::{Plan, PlanStep};

/// Errors raised while parsing a plan response. No partial plan is ever
/// returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanParseError {
    /// The response never entered the `Plan:` section
    #[error("response has no 'Plan:' section")]
    MissingPlanSection,
    /// A `- Step` header without a number before its colon
    #[error("step header on line {line} has no step number")]
    MissingStepNumber { line: usize },
    /// A step number that is not a positive integer
    #[error("step number '{value}' on line {line} is not a positive integer")]
    InvalidStepNumber { line: usize, value: String },
    /// A step number not greater than the one before it
    #[error("step {found} on line {line} does not follow step {previous}")]
    NonIncreasingStepNumber {
        line: usize,
        previous: u64,
        found: u64,
    },
    /// A `- File:`, `- Action:` or `- Description:` line outside any step
    #[error("'{field}' on line {line} appears before any step")]
    NoOpenStep { line: usize, field: String },
}

const FOCUS_PREFIX: &str = "Current Focus:";
const PLAN_MARKER: &str = "Plan:";
const STEP_PREFIX: &str = "- Step";
const FILE_PREFIX: &str = "- File:";
const ACTION_PREFIX: &str = "- Action:";
const DESCRIPTION_PREFIX: &str = "- Description:";

#[derive(Default)]
struct ParserState {
    plan: Plan,
    in_plan: bool,
    current: Option<PlanStep>,
    in_description: bool,
    last_number: Option<u64>,
}

impl ParserState {
    fn open_step(&mut self, line: usize, field: &str) -> Result<&mut PlanStep, PlanParseError> {
        self.current.as_mut().ok_or_else(|| PlanParseError::NoOpenStep {
            line,
            field: field.trim_start_matches("- ").trim_end_matches(':').to_string(),
        })
    }

    fn start_step(&mut self, line: usize, text: &str) -> Result<(), PlanParseError> {
        let number = step_number(line, text)?;
        if let Some(previous) = self.last_number {
            if number <= previous {
                return Err(PlanParseError::NonIncreasingStepNumber {
                    line,
                    previous,
                    found: number,
                });
            }
        }

        if let Some(step) = self.current.take() {
            self.plan.steps.push(step);
        }
        self.last_number = Some(number);
        self.in_description = false;
        self.current = Some(PlanStep {
            step_number: number.to_string(),
            ..PlanStep::default()
        });
        Ok(())
    }

    fn finish(mut self) -> Result<Plan, PlanParseError> {
        if !self.in_plan {
            return Err(PlanParseError::MissingPlanSection);
        }
        if let Some(mut step) = self.current.take() {
            step.description = step.description.replace("```", "").trim().to_string();
            self.plan.steps.push(step);
        }
        Ok(self.plan)
    }
}

/// Parses a plan response.
///
/// Lines are trimmed before matching. `Current Focus:` may appear anywhere;
/// everything else is read only after the `Plan:` marker. Inside the plan,
/// `- Step N:` opens a step, `- File:`, `- Action:` and `- Description:`
/// fill it, and any other non-empty line while a description is open is
/// appended to that description with a single space.
///
/// ```rust
/// use mender_core::compiler::parse_plan;
///
/// let plan = parse_plan(
///     "Current Focus: Add a hello endpoint\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: create\n  - Description: Create a Flask app\n    with a /hello route\n",
/// )
/// .unwrap();
/// assert_eq!(plan.steps.len(), 1);
/// assert_eq!(plan.steps[0].description, "Create a Flask app with a /hello route");
/// ```
///
/// # Errors
///
/// Returns a [`PlanParseError`] when the plan section is missing, a step
/// number is missing, invalid or not increasing, or a field line appears
/// before the first step.
pub fn parse_plan(text: &str) -> Result<Plan, PlanParseError> {
    let mut state = ParserState::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if let Some(focus) = line.strip_prefix(FOCUS_PREFIX) {
            state.plan.current_focus = focus.trim().to_string();
            continue;
        }
        if line.starts_with(PLAN_MARKER) {
            state.in_plan = true;
            continue;
        }
        if !state.in_plan {
            continue;
        }

        if line.starts_with(STEP_PREFIX) {
            state.start_step(line_no, line)?;
        } else if let Some(value) = line.strip_prefix(FILE_PREFIX) {
            state.open_step(line_no, FILE_PREFIX)?.target_file = value.trim().to_string();
            state.in_description = false;
        } else if let Some(value) = line.strip_prefix(ACTION_PREFIX) {
            state.open_step(line_no, ACTION_PREFIX)?.action_kind = value.trim().to_string();
            state.in_description = false;
        } else if let Some(value) = line.strip_prefix(DESCRIPTION_PREFIX) {
            state.open_step(line_no, DESCRIPTION_PREFIX)?.description = value.trim().to_string();
            state.in_description = true;
        } else if !line.is_empty() && state.in_description {
            let step = state.open_step(line_no, "continuation")?;
            if !step.description.is_empty() {
                step.description.push(' ');
            }
            step.description.push_str(line);
        }
    }

    state.finish()
}

/// Third whitespace-separated token of the text before the first colon.
fn step_number(line: usize, text: &str) -> Result<u64, PlanParseError> {
    let head = text.split(':').next().unwrap_or(text);
    let token = head
        .split_whitespace()
        .nth(2)
        .ok_or(PlanParseError::MissingStepNumber { line })?;

    match token.parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(PlanParseError::InvalidStepNumber {
            line,
            value: token.to_string(),
        }),
    }
}

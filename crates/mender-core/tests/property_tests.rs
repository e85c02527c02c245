use mender_core::{
    compiler::{parse_plan, PlanParseError},
    format::BlockFormat,
    models::{FileChange, Plan, PlanStep},
};
use proptest::prelude::*;

/// Relative paths without backticks, colons or whitespace.
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}(/[a-z][a-z0-9_]{0,8}){0,2}\\.[a-z]{1,3}"
}

/// Body text whose lines never open a fence or close the wrapper.
fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[ a-zA-Z0-9_=().,'\"#-]{0,24}", 0..6).prop_map(|lines| lines.join("\n"))
}

fn changes_strategy() -> impl Strategy<Value = Vec<FileChange>> {
    prop::collection::vec(
        (path_strategy(), content_strategy()).prop_map(|(path, content)| FileChange::new(path, content)),
        1..5,
    )
}

/// Single-line text with no surrounding whitespace and no colons.
fn field_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.]{0,30}[A-Za-z0-9]"
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    let step = (1..5u64, path_strategy(), "create|modify|delete", field_strategy());
    (field_strategy(), prop::collection::vec(step, 0..6)).prop_map(|(focus, steps)| {
        let mut number = 0;
        let steps = steps
            .into_iter()
            .map(|(gap, target_file, action_kind, description)| {
                number += gap;
                PlanStep {
                    step_number: number.to_string(),
                    target_file,
                    action_kind,
                    description,
                }
            })
            .collect();
        Plan {
            current_focus: focus,
            steps,
        }
    })
}

fn plan_text(numbers: &[u64]) -> String {
    let mut text = String::from("Current Focus: Numbering\nPlan:\n");
    for number in numbers {
        text.push_str(&format!(
            "- Step {number}:\n  - File: a.py\n  - Action: modify\n  - Description: Step {number}\n"
        ));
    }
    text
}

proptest! {
    #[test]
    fn prop_plain_blocks_round_trip(changes in changes_strategy()) {
        let rendered = BlockFormat::Plain.render(&changes);
        prop_assert!(BlockFormat::Plain.is_well_formed(&rendered));
        prop_assert_eq!(BlockFormat::Plain.parse(&rendered).unwrap(), changes);
    }

    #[test]
    fn prop_markdown_blocks_round_trip(changes in changes_strategy()) {
        let rendered = BlockFormat::Markdown.render(&changes);
        prop_assert_eq!(BlockFormat::Markdown.parse(&rendered).unwrap(), changes);
    }

    #[test]
    fn prop_plan_text_round_trip(plan in plan_strategy()) {
        let reparsed = parse_plan(&plan.to_text()).unwrap();
        prop_assert_eq!(&reparsed, &plan);
        prop_assert_eq!(parse_plan(&reparsed.to_text()).unwrap(), reparsed);
    }

    #[test]
    fn prop_step_numbers_must_increase(numbers in prop::collection::vec(1..10u64, 1..6)) {
        let increasing = numbers.windows(2).all(|pair| pair[0] < pair[1]);

        match parse_plan(&plan_text(&numbers)) {
            Ok(plan) => {
                prop_assert!(increasing);
                let parsed: Vec<String> = plan.steps.iter().map(|s| s.step_number.clone()).collect();
                let expected: Vec<String> = numbers.iter().map(u64::to_string).collect();
                prop_assert_eq!(parsed, expected);
            }
            Err(PlanParseError::NonIncreasingStepNumber { previous, found, .. }) => {
                prop_assert!(!increasing);
                prop_assert!(found <= previous);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

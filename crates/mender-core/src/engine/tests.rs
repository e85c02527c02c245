use tempfile::TempDir;

use super::{decision, ExecutionEngine};
use crate::{
    compiler::PlanCompiler,
    config::EngineConfig,
    error::MenderError,
    llm::ScriptedModel,
    models::{
        CommandResult, CommandState, ExitKind, FileContent, Plan, PlanStep, RepairAction,
        RepositorySnapshot, RunReport, Status,
    },
    patcher::PatchCoordinator,
    repository::LocalRepository,
    sandbox::ScriptedRunner,
    synthesizer::CodeSynthesizer,
};

fn test_plan() -> Plan {
    Plan {
        current_focus: "Add tests".to_string(),
        steps: vec![PlanStep {
            step_number: "1".to_string(),
            target_file: "test_app.py".to_string(),
            action_kind: "create".to_string(),
            description: "Add a smoke test".to_string(),
        }],
    }
}

fn module_not_found() -> CommandResult {
    CommandResult::exited(
        2,
        "collected 0 items / 1 error",
        "ModuleNotFoundError: No module named 'foo'",
    )
}

async fn run_engine(
    model: &ScriptedModel,
    runner: &ScriptedRunner,
    snapshot: &mut RepositorySnapshot,
) -> RunReport {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let repo = LocalRepository::new(dir.path());
    let config = EngineConfig::default();
    let patcher = PatchCoordinator::new(
        PlanCompiler::new(model),
        CodeSynthesizer::new(model, &repo, config.max_reformat_attempts),
    );
    let engine = ExecutionEngine::new(model, runner, patcher, dir.path(), &config);
    engine
        .run("make the tests pass", &test_plan(), snapshot, "")
        .await
}

#[tokio::test]
async fn test_all_commands_succeed() {
    let model = ScriptedModel::new([r#"{"commands": ["pip install -r requirements.txt", "pytest"]}"#]);
    let runner = ScriptedRunner::new()
        .on("pip install -r requirements.txt", [CommandResult::exited(0, "installed", "")])
        .on("pytest", [CommandResult::exited(0, "1 passed", "")]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.stdout, "1 passed");
    assert_eq!(report.repair_attempts, 0);
    assert_eq!(report.commands.len(), 2);
    assert!(report
        .commands
        .iter()
        .all(|trace| trace.state == CommandState::Succeeded));
    assert_eq!(model.prompts().len(), 1);
}

#[tokio::test]
async fn test_rerun_repairs_missing_module() {
    let model = ScriptedModel::new([
        "```json\n{\"commands\": [\"pytest\"]}\n```",
        r#"{"action": "rerun", "command": "pip install foo && pytest", "rationale": "foo is not installed"}"#,
    ]);
    let runner = ScriptedRunner::new()
        .on("pytest", [module_not_found()])
        .on("pip install foo && pytest", [CommandResult::exited(0, "1 passed", "")]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.repair_attempts, 1);
    assert_eq!(report.stdout, "1 passed");
    assert_eq!(report.commands[0].state, CommandState::Succeeded);
    assert_eq!(runner.executed(), vec!["pytest", "pip install foo && pytest"]);

    let repair_prompt = &model.prompts()[1];
    assert!(repair_prompt.contains("ModuleNotFoundError"));
    assert!(repair_prompt.contains("1. pytest"));
}

#[tokio::test]
async fn test_repair_budget_is_exactly_five() {
    let model = ScriptedModel::new([r#"{"commands": ["pytest"]}"#]);
    for _ in 0..10 {
        model.push(r#"{"action": "rerun", "command": "pytest -x"}"#);
    }
    let runner = ScriptedRunner::new()
        .on("pytest", [module_not_found()])
        .on("pytest -x", [module_not_found()]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Failed);
    assert_eq!(report.repair_attempts, 5);
    assert_eq!(report.commands[0].state, CommandState::Failed);
    assert_eq!(report.commands[0].repair_attempts, 5);
    assert_eq!(report.stderr, "ModuleNotFoundError: No module named 'foo'");
    assert!(report.description.contains("exhausted"));
    assert_eq!(model.prompts().len(), 6);
    assert_eq!(runner.executed().len(), 6);
}

#[tokio::test]
async fn test_patch_then_rerun_original() {
    let model = ScriptedModel::new([
        r#"{"commands": ["python app.py"]}"#,
        r#"{"action": "patch", "response": "app.py has a syntax error"}"#,
        "Current Focus: Fix syntax\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: modify\n  - Description: Close the parenthesis\n",
        "~~~\nFile: app.py\n```\nprint('fixed')\n```\n~~~",
    ]);
    let runner = ScriptedRunner::new().on(
        "python app.py",
        [
            CommandResult::exited(1, "", "SyntaxError: '(' was never closed"),
            CommandResult::exited(0, "fixed\n", ""),
        ],
    );
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.repair_attempts, 1);
    assert_eq!(report.stdout, "fixed\n");
    assert_eq!(runner.executed(), vec!["python app.py", "python app.py"]);
    assert_eq!(
        snapshot.get("app.py").and_then(FileContent::as_text),
        Some("print('fixed')")
    );
    assert!(model.prompts()[2].contains("SyntaxError"));
}

#[tokio::test]
async fn test_second_repair_prompt_shows_patched_files() {
    let model = ScriptedModel::new([
        r#"{"commands": ["python app.py"]}"#,
        r#"{"action": "patch"}"#,
        "Current Focus: Fix\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: modify\n  - Description: Fix it\n",
        "~~~\nFile: app.py\n```\nprint('attempt one')\n```\n~~~",
        r#"{"action": "rerun", "command": "python3 app.py"}"#,
    ]);
    let runner = ScriptedRunner::new()
        .on("python app.py", [CommandResult::exited(1, "", "boom")])
        .on("python3 app.py", [CommandResult::exited(0, "ok", "")]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.repair_attempts, 2);
    assert!(model.prompts()[4].contains("File: `app.py`:"));
}

#[tokio::test]
async fn test_malformed_decision_fails_immediately() {
    let model = ScriptedModel::new([
        r#"{"commands": ["pytest"]}"#,
        r#"{"action": "pray"}"#,
    ]);
    let runner = ScriptedRunner::new().on("pytest", [module_not_found()]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Failed);
    assert_eq!(report.repair_attempts, 1);
    assert_eq!(report.stderr, "ModuleNotFoundError: No module named 'foo'");
    assert!(report.description.contains("unknown action"));
    assert_eq!(runner.executed(), vec!["pytest"]);
}

#[tokio::test]
async fn test_patch_failure_fails_immediately() {
    let model = ScriptedModel::new([
        r#"{"commands": ["pytest"]}"#,
        r#"{"action": "patch"}"#,
        "no plan here",
    ]);
    let runner = ScriptedRunner::new().on("pytest", [module_not_found()]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Failed);
    assert!(report.description.contains("patch failed"));
    assert_eq!(runner.executed(), vec!["pytest"]);
}

#[tokio::test]
async fn test_unparseable_commands_run_nothing() {
    let model = ScriptedModel::new(["Run pytest, I guess."]);
    let runner = ScriptedRunner::new();
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Failed);
    assert!(report.description.starts_with("Could not derive commands"));
    assert!(report.commands.is_empty());
    assert!(runner.executed().is_empty());
}

#[tokio::test]
async fn test_empty_command_list_succeeds() {
    let model = ScriptedModel::new([r#"{"commands": []}"#]);
    let runner = ScriptedRunner::new();
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert!(runner.executed().is_empty());
}

#[tokio::test]
async fn test_unrepaired_command_stops_later_commands() {
    let model = ScriptedModel::new([
        r#"{"commands": ["make build", "make test"]}"#,
        r#"{"action": "rerun"}"#,
    ]);
    let runner = ScriptedRunner::new()
        .on("make build", [CommandResult::exited(2, "", "No rule to make target")])
        .on("make test", [CommandResult::exited(0, "", "")]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Failed);
    assert_eq!(report.commands.len(), 1);
    assert_eq!(runner.executed(), vec!["make build"]);
}

#[tokio::test]
async fn test_spawn_failure_enters_repair() {
    let model = ScriptedModel::new([
        r#"{"commands": ["cargo test"]}"#,
        r#"{"action": "command", "command": "cargo test --offline"}"#,
    ]);
    let runner = ScriptedRunner::new()
        .on("cargo test --offline", [CommandResult::exited(0, "ok", "")]);
    let mut snapshot = RepositorySnapshot::new();

    let report = run_engine(&model, &runner, &mut snapshot).await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.repair_attempts, 1);
    assert!(model.prompts()[1].contains("no scripted result"));
}

#[test]
fn test_parse_commands_variants() {
    assert_eq!(
        decision::parse_commands("```json\n{\"commands\": [\"a\", \"b\"]}\n```").unwrap(),
        vec!["a", "b"]
    );
    assert!(matches!(
        decision::parse_commands(r#"{"steps": []}"#),
        Err(MenderError::MalformedResponse { stage: "commands", .. })
    ));
    assert!(decision::parse_commands(r#"{"commands": [1, 2]}"#).is_err());
    assert!(decision::parse_commands(r#"["a"]"#).is_err());
}

#[test]
fn test_parse_repair_decision_variants() {
    let patch = decision::parse_repair_decision(r#"{"action": "PATCH", "rationale": "bad import"}"#).unwrap();
    assert_eq!(patch.action, RepairAction::Patch);
    assert_eq!(patch.rationale.as_deref(), Some("bad import"));

    assert!(decision::parse_repair_decision(r#"{"action": "rerun", "command": "  "}"#).is_err());
    assert!(decision::parse_repair_decision(r#"{"response": "no action"}"#).is_err());
    assert!(decision::parse_repair_decision("not json").is_err());
}

#[test]
fn test_timed_out_result_is_failure() {
    let result = CommandResult {
        stdout: String::new(),
        stderr: "Command timed out after 600s".to_string(),
        exit: ExitKind::TimedOut,
    };
    assert!(!result.is_success());
}

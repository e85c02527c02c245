use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag and no API keys
fn mender_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mender").expect("Failed to find mender binary");
    cmd.env_remove("MENDER_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.path().join("cli_test.db"))
        .arg("--workspace")
        .arg(temp_dir.path());
    cmd
}

#[test]
fn test_cli_help_lists_subcommands() {
    Command::cargo_bin("mender")
        .expect("Failed to find mender binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("--max-repairs"));
}

#[test]
fn test_cli_history_empty() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 plan(s)"))
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_show_missing_plan_fails() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir)
        .args(["show", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan with ID 999 not found"));
}

#[test]
fn test_cli_plan_without_api_key_fails() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir)
        .args(["plan", "add", "a", "hello", "endpoint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"))
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_cli_anthropic_provider_names_its_key() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir)
        .args(["--provider", "anthropic", "run", "add tests"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_cli_rejects_unknown_provider() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir)
        .args(["--provider", "llama", "history"])
        .assert()
        .failure();
}

#[test]
fn test_cli_plan_requires_intent() {
    let temp_dir = create_cli_test_environment();

    mender_cmd(&temp_dir).arg("plan").assert().failure();
}

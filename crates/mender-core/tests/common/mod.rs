use std::{path::PathBuf, sync::Arc};

use mender_core::{
    llm::ScriptedModel, models::CommandResult, sandbox::ScriptedRunner, Session, SessionBuilder,
};
use tempfile::TempDir;

pub const HELLO_PLAN: &str = "Current Focus: Add a hello endpoint\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: create\n  - Description: Create a Flask app with a /hello route\n";

pub const HELLO_CODE: &str = "~~~\nFile: app.py\n```python\nfrom flask import Flask\n\napp = Flask(__name__)\n\n\n@app.route(\"/hello\")\ndef hello():\n    return \"Hello, world!\"\n```\n~~~";

/// A session over an empty workspace inside a temporary directory.
pub struct TestSession {
    pub _temp_dir: TempDir,
    pub workspace: PathBuf,
    pub session: Session,
    pub model: Arc<ScriptedModel>,
    pub runner: Arc<ScriptedRunner>,
}

/// Helper function to create a test session with scripted collaborators
pub async fn create_test_session(model: ScriptedModel, runner: ScriptedRunner) -> TestSession {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let workspace = temp_dir.path().join("hello-service");
    std::fs::create_dir(&workspace).expect("Failed to create workspace");
    let db_path = temp_dir.path().join("test.db");

    let model = Arc::new(model);
    let runner = Arc::new(runner);
    let session = SessionBuilder::new()
        .with_database_path(Some(&db_path))
        .with_workspace(&workspace)
        .with_model(model.clone())
        .with_runner(runner.clone())
        .build()
        .await
        .expect("Failed to create session");

    TestSession {
        _temp_dir: temp_dir,
        workspace,
        session,
        model,
        runner,
    }
}

pub fn module_not_found() -> CommandResult {
    CommandResult::exited(
        2,
        "collected 0 items / 1 error",
        "ModuleNotFoundError: No module named 'foo'",
    )
}

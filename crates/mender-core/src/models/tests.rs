#[cfg(test)]
mod model_tests {
    use crate::error::MenderError;
    use crate::models::{
        normalize_path, CommandResult, CommandState, ExitKind, FileChange, FileContent, Outcome,
        Plan, PlanStep, RepairAction, RepairDecision, RepositorySnapshot, Status, StructureNode,
    };

    fn create_test_snapshot() -> RepositorySnapshot {
        let mut snapshot = RepositorySnapshot::new();
        snapshot
            .insert("README.md", FileContent::Text("# Demo\n".to_string()), 7)
            .unwrap();
        snapshot
            .insert("src/app.py", FileContent::Text("print('hi')\n".to_string()), 12)
            .unwrap();
        snapshot
            .insert("assets/logo.png", FileContent::Undecodable, 2048)
            .unwrap();
        snapshot
    }

    #[test]
    fn test_snapshot_insert_builds_structure() {
        let snapshot = create_test_snapshot();

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.is_consistent());

        let top: Vec<&StructureNode> = snapshot.structure().iter().collect();
        assert_eq!(top.len(), 3);
        match top[1] {
            StructureNode::Directory { name, path, contents } => {
                assert_eq!(name, "src");
                assert_eq!(path, "src");
                assert_eq!(contents.len(), 1);
            }
            StructureNode::File { .. } => panic!("expected a directory node"),
        }
    }

    #[test]
    fn test_snapshot_apply_updates_existing_file() {
        let mut snapshot = create_test_snapshot();

        snapshot
            .apply(&FileChange::new("src/app.py", "print('bye')\n"))
            .unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot.get("src/app.py").and_then(FileContent::as_text),
            Some("print('bye')\n")
        );
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_snapshot_apply_creates_nested_directories() {
        let mut snapshot = RepositorySnapshot::new();

        snapshot
            .apply(&FileChange::new("./pkg/sub/mod.py", "x = 1\n"))
            .unwrap();

        assert!(snapshot.contains("pkg/sub/mod.py"));
        assert_eq!(snapshot.structure_paths(), vec!["pkg/sub/mod.py".to_string()]);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_snapshot_rejects_file_directory_collision() {
        let mut snapshot = create_test_snapshot();

        let result = snapshot.apply(&FileChange::new("README.md/nested.txt", "x"));
        match result.unwrap_err() {
            MenderError::InvalidPath { reason, .. } => {
                assert_eq!(reason, "'README.md' is a file, not a directory")
            }
            other => panic!("Expected InvalidPath error, got {other:?}"),
        }

        let result = snapshot.apply(&FileChange::new("src", "x"));
        assert!(result.is_err());

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_normalize_path_rejects_escapes() {
        assert_eq!(normalize_path("a/./b.txt").unwrap(), "a/b.txt");
        assert_eq!(normalize_path("a\\b.txt").unwrap(), "a/b.txt");
        assert!(normalize_path("../secret").is_err());
        assert!(normalize_path("a/../../b").is_err());
        assert!(normalize_path("/etc/passwd").is_err());
        assert!(normalize_path("C:/Windows").is_err());
        assert!(normalize_path("  ").is_err());
    }

    #[test]
    fn test_content_hash_tracks_changes() {
        let mut snapshot = create_test_snapshot();
        let before = snapshot.content_hash();

        assert_eq!(before, create_test_snapshot().content_hash());
        assert_eq!(before.len(), 64);

        snapshot
            .apply(&FileChange::new("README.md", "# Changed\n"))
            .unwrap();
        assert_ne!(before, snapshot.content_hash());
    }

    #[test]
    fn test_render_structure_and_contents() {
        let snapshot = create_test_snapshot();

        let structure = snapshot.render_structure();
        assert!(structure.contains("src/\n"));
        assert!(structure.contains("  app.py (12 bytes)"));

        let contents = snapshot.render_contents();
        assert!(contents.contains("### src/app.py"));
        assert!(contents.contains("print('hi')"));
        assert!(contents.contains("(undecodable content)"));

        let empty = RepositorySnapshot::new();
        assert_eq!(empty.render_structure(), "(empty repository)\n");
        assert_eq!(empty.render_contents(), "(no files)\n");
    }

    #[test]
    fn test_plan_to_text_shape() {
        let plan = Plan {
            current_focus: "Add endpoint".to_string(),
            steps: vec![PlanStep {
                step_number: "1".to_string(),
                target_file: "app.py".to_string(),
                action_kind: "create".to_string(),
                description: "Create the app".to_string(),
            }],
        };

        assert_eq!(
            plan.to_text(),
            "Current Focus: Add endpoint\nPlan:\n- Step 1:\n  - File: app.py\n  - Action: create\n  - Description: Create the app\n"
        );
        assert!(!plan.is_empty());
        assert!(Plan::default().is_empty());
    }

    #[test]
    fn test_command_result_success() {
        assert!(CommandResult::exited(0, "ok", "").is_success());
        assert!(!CommandResult::exited(1, "", "boom").is_success());

        let spawn = CommandResult::spawn_failed("No such file or directory");
        assert_eq!(spawn.exit, ExitKind::SpawnFailed);
        assert_eq!(spawn.stderr, "No such file or directory");
        assert!(!spawn.is_success());

        assert_eq!(ExitKind::Code(2).to_string(), "exit code 2");
        assert_eq!(ExitKind::TimedOut.to_string(), "timed out");
    }

    #[test]
    fn test_repair_decision_serde() {
        let decision: RepairDecision = serde_json::from_str(
            r#"{"action": "rerun", "command": "pip install foo && pytest", "rationale": "missing module"}"#,
        )
        .unwrap();
        assert_eq!(
            decision.action,
            RepairAction::Rerun {
                command: "pip install foo && pytest".to_string()
            }
        );
        assert_eq!(decision.rationale.as_deref(), Some("missing module"));

        let decision: RepairDecision = serde_json::from_str(r#"{"action": "patch"}"#).unwrap();
        assert_eq!(decision.action, RepairAction::Patch);
        assert!(decision.rationale.is_none());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("success".parse::<Status>().unwrap(), Status::Success);
        assert_eq!("FAILED".parse::<Status>().unwrap(), Status::Failed);
        assert!("done".parse::<Status>().is_err());
        assert_eq!(Status::Failed.as_str(), "failed");
    }

    #[test]
    fn test_command_state_terminal() {
        assert!(!CommandState::Running.is_terminal());
        assert!(!CommandState::Repairing.is_terminal());
        assert!(CommandState::Succeeded.is_terminal());
        assert!(CommandState::Failed.is_terminal());
    }

    #[test]
    fn test_outcome_map() {
        let outcome = Outcome::success("compiled", 3u32).map(|n| n * 2);
        assert!(outcome.is_success());
        assert_eq!(outcome.value, Some(6));

        let failed: Outcome<u32> = Outcome::failed("nope");
        assert_eq!(failed.status, Status::Failed);
        assert!(failed.value.is_none());
    }
}

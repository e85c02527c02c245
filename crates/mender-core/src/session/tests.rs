use std::sync::Arc;

use tempfile::TempDir;

use super::SessionBuilder;
use crate::{config::EngineConfig, error::MenderError, llm::ScriptedModel, sandbox::ScriptedRunner};

#[tokio::test]
async fn test_build_requires_model() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let result = SessionBuilder::new()
        .with_database_path(Some(dir.path().join("mender.db")))
        .with_workspace(dir.path())
        .build()
        .await;

    assert!(matches!(result, Err(MenderError::Configuration { .. })));
}

#[tokio::test]
async fn test_build_creates_database_and_names_repository() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let workspace = dir.path().join("shop-api");
    std::fs::create_dir(&workspace).expect("Failed to create workspace");
    let db_path = dir.path().join("nested").join("mender.db");

    let session = SessionBuilder::new()
        .with_database_path(Some(&db_path))
        .with_workspace(&workspace)
        .with_model(Arc::new(ScriptedModel::new(Vec::<String>::new())))
        .build()
        .await
        .expect("Failed to build session");

    assert!(db_path.exists());
    assert_eq!(session.repository_name(), "shop-api");
    assert_eq!(session.database_path(), db_path.as_path());
    assert_eq!(session.config(), &EngineConfig::default());
}

#[tokio::test]
async fn test_builder_overrides() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let config = EngineConfig {
        max_repair_attempts: 2,
        ..EngineConfig::default()
    };

    let session = SessionBuilder::new()
        .with_database_path(Some(dir.path().join("mender.db")))
        .with_workspace(dir.path())
        .with_model(Arc::new(ScriptedModel::new(Vec::<String>::new())))
        .with_runner(Arc::new(ScriptedRunner::new()))
        .with_repository_name("acme/widgets")
        .with_engine_config(config.clone())
        .build()
        .await
        .expect("Failed to build session");

    assert_eq!(session.repository_name(), "acme/widgets");
    assert_eq!(session.config().max_repair_attempts, 2);
}

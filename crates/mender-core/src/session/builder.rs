//! Builder for creating and configuring Session instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::Session;
use crate::{
    config::EngineConfig,
    error::{IoResultExt, MenderError, Result},
    llm::LanguageModel,
    repository::LocalRepository,
    sandbox::{CommandRunner, ShellRunner},
    store::ArtifactStore,
};

/// Builder for creating and configuring Session instances.
#[derive(Default)]
pub struct SessionBuilder {
    database_path: Option<PathBuf>,
    workspace: Option<PathBuf>,
    model: Option<Arc<dyn LanguageModel>>,
    runner: Option<Arc<dyn CommandRunner>>,
    repository_name: Option<String>,
    config: EngineConfig,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG data directory:
    /// `$XDG_DATA_HOME/mender/mender.db` or `~/.local/share/mender/mender.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the workspace root. Defaults to the current directory.
    pub fn with_workspace<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.workspace = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the language model. Required.
    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the command runner. Defaults to a [`ShellRunner`] using the
    /// configured command timeout.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Sets the repository name recorded with stored artifacts. Defaults to
    /// the workspace directory name.
    pub fn with_repository_name(mut self, name: impl Into<String>) -> Self {
        self.repository_name = Some(name.into());
        self
    }

    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the configured session.
    ///
    /// # Errors
    ///
    /// Returns `MenderError::Configuration` if no model was set or the
    /// workspace cannot be resolved, `MenderError::FileSystem` if the
    /// database directory cannot be created and `MenderError::Store` if the
    /// database cannot be initialized.
    pub async fn build(self) -> Result<Session> {
        let model = self.model.ok_or_else(|| MenderError::Configuration {
            message: "A language model is required".to_string(),
        })?;

        let current_dir = std::env::current_dir().at_path(".")?;
        let workspace = match self.workspace {
            Some(path) if path.is_absolute() => path,
            Some(path) => current_dir.join(path),
            None => current_dir,
        };

        let repository_name = match self.repository_name {
            Some(name) => name,
            None => Self::default_repository_name(&workspace),
        };

        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _store = ArtifactStore::open(&db_path_clone)?;
            Ok::<(), MenderError>(())
        })
        .await
        .map_err(|e| MenderError::join(&e))??;

        let config = self.config;
        let runner = self
            .runner
            .unwrap_or_else(|| Arc::new(ShellRunner::new(config.command_timeout)));

        Ok(Session {
            model,
            runner,
            repository: LocalRepository::new(workspace),
            repository_name,
            db_path,
            config,
        })
    }

    fn default_repository_name(workspace: &Path) -> String {
        workspace
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| workspace.display().to_string())
    }

    /// Returns the default database path in the XDG data directory.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("mender")
            .place_data_file("mender.db")
            .map_err(|e| MenderError::XdgDirectory(e.to_string()))
    }
}

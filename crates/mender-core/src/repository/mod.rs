//! Repository access: loading a snapshot from disk and writing edits back.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, info};
use tokio::task;
use walkdir::{DirEntry, WalkDir};

use crate::{
    error::{IoResultExt, MenderError, Result},
    models::{normalize_path, FileContent, RepositorySnapshot},
};

/// Directories never descended into.
const IGNORED_DIRS: &[&str] = &[".git", "__pycache__", "node_modules", ".venv"];

/// OS and VCS noise files.
const IGNORED_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
];

/// Binary formats skipped entirely.
const IGNORED_EXTENSIONS: &[&str] = &[
    "exe", "pyc", "pyo", "pyd", "dll", "so", "dylib", "zip", "tar", "gz", "rar", "jpg", "jpeg",
    "png", "gif", "bmp", "ico", "svg", "mp3", "mp4", "avi", "mov", "pdf",
];

/// Files larger than this are recorded as undecodable.
pub const MAX_TEXT_FILE_SIZE: u64 = 1024 * 1024;

/// Source of repository snapshots.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    async fn load(&self) -> Result<RepositorySnapshot>;
}

/// Destination for synthesized file contents.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes `content` to the repository-relative `path`, creating parent
    /// directories as needed.
    async fn write(&self, path: &str, content: &str) -> Result<()>;
}

/// A repository checked out in a local directory.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a repository-relative path to a location under the root.
    ///
    /// # Errors
    ///
    /// Returns `MenderError::InvalidPath` for absolute paths and paths that
    /// would escape the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = normalize_path(path)?;
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl RepositoryProvider for LocalRepository {
    async fn load(&self) -> Result<RepositorySnapshot> {
        let root = self.root.clone();
        let snapshot = task::spawn_blocking(move || scan(&root))
            .await
            .map_err(|e| MenderError::join(&e))??;
        info!(
            "Loaded {} file(s) from {}",
            snapshot.len(),
            self.root.display()
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl FileStore for LocalRepository {
    async fn write(&self, path: &str, content: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.at_path(parent)?;
        }
        tokio::fs::write(&target, content).await.at_path(&target)?;
        debug!("Wrote {} byte(s) to {}", content.len(), target.display());
        Ok(())
    }
}

fn scan(root: &Path) -> Result<RepositorySnapshot> {
    if !root.is_dir() {
        return Err(MenderError::Configuration {
            message: format!("workspace '{}' is not a directory", root.display()),
        });
    }

    let mut snapshot = RepositorySnapshot::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            MenderError::FileSystem {
                path,
                source: e.into(),
            }
        })?;
        if !entry.file_type().is_file() || is_ignored_file(entry.path()) {
            continue;
        }

        let Some(relative) = relative_path(root, entry.path()) else {
            continue;
        };
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let content = read_content(entry.path(), size)?;
        snapshot.insert(&relative, content, size)?;
    }

    Ok(snapshot)
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

fn is_ignored_file(path: &Path) -> bool {
    let name_ignored = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| IGNORED_FILES.contains(&name));
    let extension_ignored = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IGNORED_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
    name_ignored || extension_ignored
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|parts| parts.join("/"))
}

fn read_content(path: &Path, size: u64) -> Result<FileContent> {
    if size > MAX_TEXT_FILE_SIZE {
        return Ok(FileContent::Undecodable);
    }
    let bytes = fs::read(path).at_path(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => FileContent::Text(text),
        Err(_) => FileContent::Undecodable,
    })
}

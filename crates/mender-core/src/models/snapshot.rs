//! Repository snapshot: file contents plus the structural tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::FileChange;
use crate::error::{MenderError, Result};

/// Content of one file in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum FileContent {
    /// Decoded UTF-8 text
    Text(String),
    /// Binary or otherwise undecodable content; kept so the path stays visible
    Undecodable,
}

impl FileContent {
    /// Returns the text if the file was decodable.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Undecodable => None,
        }
    }
}

/// One node of the repository structure tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StructureNode {
    Directory {
        name: String,
        path: String,
        contents: Vec<StructureNode>,
    },
    File {
        name: String,
        path: String,
        size: u64,
    },
}

impl StructureNode {
    fn name(&self) -> &str {
        match self {
            StructureNode::Directory { name, .. } | StructureNode::File { name, .. } => name,
        }
    }
}

/// Working state of a repository during a session.
///
/// `files` and `structure` are kept mutually consistent: every path in
/// `files` has a `File` node in `structure` and every `File` node has an
/// entry in `files`. All mutation goes through [`RepositorySnapshot::insert`]
/// and [`RepositorySnapshot::apply`], which maintain that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    files: BTreeMap<String, FileContent>,
    structure: Vec<StructureNode>,
}

impl RepositorySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// File contents keyed by repository-relative path.
    pub fn files(&self) -> &BTreeMap<String, FileContent> {
        &self.files
    }

    /// Top-level nodes of the structure tree.
    pub fn structure(&self) -> &[StructureNode] {
        &self.structure
    }

    pub fn get(&self, path: &str) -> Option<&FileContent> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Upserts a file, creating intermediate directory nodes as needed.
    ///
    /// # Errors
    ///
    /// Returns `MenderError::InvalidPath` if the path is not a clean relative
    /// path or collides with an existing node of the other kind.
    pub fn insert(&mut self, path: &str, content: FileContent, size: u64) -> Result<()> {
        let path = normalize_path(path)?;
        insert_node(&mut self.structure, &path, size)?;
        self.files.insert(path, content);
        Ok(())
    }

    /// Applies a file change record as new text content.
    pub fn apply(&mut self, change: &FileChange) -> Result<()> {
        let size = change.content.len() as u64;
        self.insert(&change.path, FileContent::Text(change.content.clone()), size)
    }

    /// Paths of all `File` nodes in tree order.
    pub fn structure_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&self.structure, &mut paths);
        paths
    }

    /// Checks that `files` and `structure` describe the same set of paths.
    pub fn is_consistent(&self) -> bool {
        let tree_paths = self.structure_paths();
        let unique: BTreeSet<&String> = tree_paths.iter().collect();
        unique.len() == tree_paths.len()
            && unique.len() == self.files.len()
            && self.files.keys().all(|path| unique.contains(path))
    }

    /// SHA-256 over paths and contents, hex encoded.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, content) in &self.files {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            match content {
                FileContent::Text(text) => {
                    hasher.update([1u8]);
                    hasher.update(text.as_bytes());
                }
                FileContent::Undecodable => hasher.update([2u8]),
            }
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    /// Renders the structure tree as an indented listing for prompts.
    pub fn render_structure(&self) -> String {
        let mut out = String::new();
        render_nodes(&self.structure, 0, &mut out);
        if out.is_empty() {
            out.push_str("(empty repository)\n");
        }
        out
    }

    /// Renders every file as a fenced block for prompts.
    pub fn render_contents(&self) -> String {
        if self.files.is_empty() {
            return "(no files)\n".to_string();
        }
        let mut out = String::new();
        for (path, content) in &self.files {
            out.push_str("### ");
            out.push_str(path);
            out.push('\n');
            match content {
                FileContent::Text(text) => {
                    out.push_str("```\n");
                    out.push_str(text);
                    if !text.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n");
                }
                FileContent::Undecodable => out.push_str("(undecodable content)\n"),
            }
        }
        out
    }
}

/// Normalizes a repository-relative path to forward slashes without `.`
/// segments.
///
/// # Errors
///
/// Rejects empty paths, absolute paths and paths containing `..`.
pub fn normalize_path(path: &str) -> Result<String> {
    let invalid = |reason: &str| MenderError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let unified = path.trim().replace('\\', "/");
    if unified.starts_with('/') || unified.chars().nth(1) == Some(':') {
        return Err(invalid("absolute paths are not allowed"));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid("parent directory segments are not allowed")),
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(invalid("path is empty"));
    }
    Ok(segments.join("/"))
}

fn insert_node(nodes: &mut Vec<StructureNode>, path: &str, size: u64) -> Result<()> {
    let segments: Vec<&str> = path.split('/').collect();
    let mut current = nodes;

    for (index, segment) in segments.iter().enumerate() {
        let node_path = segments[..=index].join("/");
        let is_leaf = index + 1 == segments.len();
        let position = current.iter().position(|node| node.name() == *segment);

        if is_leaf {
            match position {
                Some(i) => match &mut current[i] {
                    StructureNode::File { size: existing, .. } => *existing = size,
                    StructureNode::Directory { .. } => {
                        return Err(MenderError::InvalidPath {
                            path: path.to_string(),
                            reason: "a directory already exists at this path".to_string(),
                        });
                    }
                },
                None => current.push(StructureNode::File {
                    name: (*segment).to_string(),
                    path: node_path,
                    size,
                }),
            }
            return Ok(());
        }

        let index = match position {
            Some(i) => i,
            None => {
                current.push(StructureNode::Directory {
                    name: (*segment).to_string(),
                    path: node_path.clone(),
                    contents: Vec::new(),
                });
                current.len() - 1
            }
        };

        current = match &mut current[index] {
            StructureNode::Directory { contents, .. } => contents,
            StructureNode::File { .. } => {
                return Err(MenderError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("'{node_path}' is a file, not a directory"),
                });
            }
        };
    }

    Ok(())
}

fn collect_paths(nodes: &[StructureNode], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            StructureNode::Directory { contents, .. } => collect_paths(contents, out),
            StructureNode::File { path, .. } => out.push(path.clone()),
        }
    }
}

fn render_nodes(nodes: &[StructureNode], depth: usize, out: &mut String) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node {
            StructureNode::Directory { name, contents, .. } => {
                out.push_str(&format!("{indent}{name}/\n"));
                render_nodes(contents, depth + 1, out);
            }
            StructureNode::File { name, size, .. } => {
                out.push_str(&format!("{indent}{name} ({size} bytes)\n"));
            }
        }
    }
}

//! File-block formats exchanged with the language model.
//!
//! Both formats wrap a sequence of file blocks in `~~~` lines. Each block is
//! a header naming the file followed by a fenced body:
//!
//! ```text
//! ~~~                          ~~~
//! File: src/app.py             File: `src/app.py`:
//! ```                          ```
//! print("hi")                  print("hi")
//! ```                          ```
//! ~~~                          ~~~
//!     Plain                        Markdown
//! ```
//!
//! A line starting with three backticks toggles the fence and is dropped.
//! Headers are recognized only outside a fence, so a body line that happens to
//! start with `File:` stays part of the content.

use thiserror::Error;

use crate::models::FileChange;


const WRAPPER: &str = "~~~";
const FENCE: &str = "```";

/// Errors raised while splitting a response into file blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockParseError {
    /// A code fence was opened and never closed
    #[error("unterminated code fence in block for '{path}'")]
    UnterminatedFence { path: String },
    /// The response contained no file header at all
    #[error("response contains no file blocks")]
    NoFileBlocks,
    /// The response is missing its `~~~` wrapper
    #[error("response is not wrapped in ~~~ lines")]
    MissingWrapper,
    /// A header line did not name a file
    #[error("file header on line {line} has no path")]
    EmptyPath { line: usize },
}

/// Dialect of file blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    /// `File: <path>` headers; produced by code synthesis
    Plain,
    /// ``File: `<path>`:`` headers; used when re-emitting code for prompts
    Markdown,
}

impl BlockFormat {
    /// Renders file changes as one wrapped response.
    pub fn render(&self, changes: &[FileChange]) -> String {
        let blocks: Vec<String> = changes
            .iter()
            .map(|change| {
                format!(
                    "{}\n{FENCE}\n{}\n{FENCE}",
                    self.header(&change.path),
                    change.content
                )
            })
            .collect();
        format!("{WRAPPER}\n{}\n{WRAPPER}", blocks.join("\n"))
    }

    /// Quick acceptance check used before parsing: wrapped in `~~~` and
    /// containing at least one header.
    pub fn is_well_formed(&self, response: &str) -> bool {
        let trimmed = response.trim();
        trimmed.len() >= 2 * WRAPPER.len()
            && trimmed.starts_with(WRAPPER)
            && trimmed.ends_with(WRAPPER)
            && trimmed.contains("File:")
    }

    /// Splits a wrapped response into file changes in order of appearance.
    ///
    /// Text before the first header is ignored. Blank lines are kept when
    /// they sit between content lines of a block; blank lines trailing an
    /// unfenced body are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`BlockParseError`] for a missing wrapper, an unbalanced
    /// fence, an empty header, or a response with no headers.
    pub fn parse(&self, response: &str) -> Result<Vec<FileChange>, BlockParseError> {
        let inner = unwrap(response).ok_or(BlockParseError::MissingWrapper)?;

        let mut changes = Vec::new();
        let mut current: Option<Block<'_>> = None;
        let mut in_fence = false;

        for (index, line) in inner.lines().enumerate() {
            if line.trim_start().starts_with(FENCE) {
                in_fence = !in_fence;
                if let Some(block) = current.as_mut() {
                    block.pending_blanks = 0;
                }
                continue;
            }

            if !in_fence {
                if let Some(path) = self.header_path(line) {
                    if path.is_empty() {
                        return Err(BlockParseError::EmptyPath { line: index + 1 });
                    }
                    if let Some(block) = current.take() {
                        changes.push(block.finish());
                    }
                    current = Some(Block::new(path));
                    continue;
                }
            }

            let Some(block) = current.as_mut() else {
                continue;
            };
            if !in_fence && line.trim().is_empty() {
                if !block.lines.is_empty() {
                    block.pending_blanks += 1;
                }
                continue;
            }
            block.push(line);
        }

        if in_fence {
            let path = current.map(|block| block.path).unwrap_or_default();
            return Err(BlockParseError::UnterminatedFence { path });
        }

        match current {
            Some(block) => changes.push(block.finish()),
            None => return Err(BlockParseError::NoFileBlocks),
        }

        Ok(changes)
    }

    fn header(&self, path: &str) -> String {
        match self {
            BlockFormat::Plain => format!("File: {path}"),
            BlockFormat::Markdown => format!("File: `{path}`:"),
        }
    }

    /// Extracts the path from a header line, or `None` if the line is not a
    /// header in this format.
    fn header_path(&self, line: &str) -> Option<String> {
        let rest = line.trim().strip_prefix("File:")?;
        let path = match self {
            BlockFormat::Plain => rest.trim().trim_end_matches(':').trim_matches('`'),
            BlockFormat::Markdown => {
                let mut parts = rest.split('`');
                parts.next();
                parts.next().unwrap_or_else(|| rest.trim().trim_end_matches(':'))
            }
        };
        Some(path.trim().to_string())
    }
}

/// Body lines collected for one header.
struct Block<'a> {
    path: String,
    lines: Vec<&'a str>,
    /// Unfenced blank lines held back until more content follows
    pending_blanks: usize,
}

impl<'a> Block<'a> {
    fn new(path: String) -> Self {
        Self {
            path,
            lines: Vec::new(),
            pending_blanks: 0,
        }
    }

    fn push(&mut self, line: &'a str) {
        self.lines
            .extend(std::iter::repeat("").take(self.pending_blanks));
        self.pending_blanks = 0;
        self.lines.push(line);
    }

    fn finish(self) -> FileChange {
        FileChange::new(self.path, self.lines.join("\n"))
    }
}

/// Returns the text between the first and last `~~~` markers.
fn unwrap(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    let start = trimmed.find(WRAPPER)? + WRAPPER.len();
    let end = trimmed.rfind(WRAPPER)?;
    (end >= start).then(|| trimmed[start..end].trim_matches('\n'))
}

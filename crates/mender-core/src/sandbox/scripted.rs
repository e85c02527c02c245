//! Command runner with canned results, for offline pipelines and tests.

use std::{
    collections::{HashMap, VecDeque},
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use super::CommandRunner;
use crate::models::CommandResult;

/// Returns queued results per command string.
///
/// Each run pops the next result for that command; the final result is
/// sticky and returned for every later run. Commands with no script fail as
/// if they could not be started.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    scripts: Mutex<HashMap<String, VecDeque<CommandResult>>>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the results of successive runs of `command`.
    pub fn on<I>(self, command: impl Into<String>, results: I) -> Self
    where
        I: IntoIterator<Item = CommandResult>,
    {
        lock(&self.scripts)
            .entry(command.into())
            .or_default()
            .extend(results);
        self
    }

    /// Commands run so far, in order.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str, _cwd: &Path) -> CommandResult {
        lock(&self.executed).push(command.to_string());

        let mut scripts = lock(&self.scripts);
        let Some(queue) = scripts.get_mut(command) else {
            return CommandResult::spawn_failed(format!("no scripted result for `{command}`"));
        };
        if queue.len() > 1 {
            if let Some(result) = queue.pop_front() {
                return result;
            }
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| CommandResult::spawn_failed(format!("no scripted result for `{command}`")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

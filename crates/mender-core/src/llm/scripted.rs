//! Deterministic model that replays canned responses.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use super::LanguageModel;
use crate::error::{MenderError, Result};

/// Replays queued responses in order and records every prompt it receives.
///
/// Running out of responses is reported as an LLM error, which is what a
/// pipeline sees when a real backend stops answering.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues another response after the existing ones.
    pub fn push(&self, response: impl Into<String>) {
        lock(&self.responses).push_back(response.into());
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Number of responses not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn query(&self, prompt: &str) -> Result<String> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.responses)
            .pop_front()
            .ok_or_else(|| MenderError::llm("scripted model has no responses left"))
    }
}

// Poisoning leaves the queue intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records_prompts() {
        let model = ScriptedModel::new(["first", "second"]);

        assert_eq!(model.query("a").await.unwrap(), "first");
        assert_eq!(model.query("b").await.unwrap(), "second");
        assert!(matches!(
            model.query("c").await,
            Err(MenderError::Llm { .. })
        ));
        assert_eq!(model.prompts(), vec!["a", "b", "c"]);
        assert_eq!(model.remaining(), 0);
    }
}

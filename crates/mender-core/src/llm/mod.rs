//! Language model access.
//!
//! Every agent talks to the model through [`LanguageModel`], a single
//! prompt-in, text-out query. Transport and API failures are returned as
//! [`MenderError::Llm`](crate::error::MenderError::Llm) values; an error is
//! never disguised as response text.

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
pub mod scripted;

pub use http::{HttpModel, Provider, DEFAULT_REQUEST_TIMEOUT};
pub use scripted::ScriptedModel;

/// A text completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one prompt and returns the raw response text.
    async fn query(&self, prompt: &str) -> Result<String>;
}

//! HTTP-backed language model for OpenAI-compatible and Anthropic APIs.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::LanguageModel;
use crate::error::{MenderError, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const MAX_TOKENS: u32 = 4096;
const MAX_ERROR_BODY_LEN: usize = 200;
/// Upper bound on one request, including reading the response body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Wire protocol spoken by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// `POST {base}/chat/completions` with bearer auth
    OpenAi,
    /// `POST {base}/messages` with `x-api-key` auth
    Anthropic,
}

impl Provider {
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_API_BASE,
            Provider::Anthropic => ANTHROPIC_API_BASE,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-3-5-sonnet-latest",
        }
    }

    /// Provider-specific environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            _ => Err(format!("Invalid provider: {s}")),
        }
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Language model reached over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpModel {
    client: Client,
    provider: Provider,
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl HttpModel {
    /// Creates a model client with the provider's default endpoint.
    pub fn new(provider: Provider, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            provider,
            api_base: provider.default_api_base().to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Limits how long a single request may take before it fails.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the endpoint base URL, e.g. for a local OpenAI-compatible
    /// server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        let request = match self.provider {
            Provider::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.api_base))
                .bearer_auth(&self.api_key)
                .json(&body),
            Provider::Anthropic => self
                .client
                .post(format!("{}/messages", self.api_base))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        };
        request.timeout(self.timeout)
    }

    fn extract_text(&self, body: &str) -> Result<String> {
        let text = match self.provider {
            Provider::OpenAi => {
                let response: ChatResponse = serde_json::from_str(body)?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
            }
            Provider::Anthropic => {
                let response: AnthropicResponse = serde_json::from_str(body)?;
                let text: String = response
                    .content
                    .into_iter()
                    .filter_map(|block| block.text)
                    .collect();
                Some(text).filter(|text| !text.is_empty())
            }
        };

        text.ok_or_else(|| MenderError::llm("response contained no text content"))
    }
}

#[async_trait]
impl LanguageModel for HttpModel {
    async fn query(&self, prompt: &str) -> Result<String> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            debug!("Sending {} byte prompt to {}", prompt.len(), self.model);
            let response = self.request(prompt).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                warn!(
                    "Rate limited by {}, retry {retries}/{MAX_RETRIES} in {}s",
                    self.api_base,
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            let body = response.text().await?;
            if !status.is_success() {
                return Err(MenderError::llm(format!(
                    "{status}: {}",
                    truncate(&body, MAX_ERROR_BODY_LEN)
                )));
            }

            let text = self.extract_text(&body)?;
            debug!("Received {} byte response", text.len());
            return Ok(text);
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

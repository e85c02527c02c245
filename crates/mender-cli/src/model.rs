//! Language model selection from flags and environment.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use mender_core::{
    llm::{HttpModel, LanguageModel, Provider},
    MenderError,
};

/// Environment variable that overrides the provider-specific key variable.
pub const API_KEY_ENV: &str = "MENDER_API_KEY";

/// Builds the HTTP model for `provider`, or a stand-in that fails every
/// query when no API key is configured.
pub fn select_model(
    provider: Provider,
    model: Option<String>,
    api_base: Option<String>,
) -> Arc<dyn LanguageModel> {
    let Some(api_key) = api_key(provider) else {
        warn!(
            "No API key found in {API_KEY_ENV} or {}; model queries will fail",
            provider.api_key_env()
        );
        return Arc::new(MissingKey { provider });
    };

    let model = model.unwrap_or_else(|| provider.default_model().to_string());
    info!("Using {provider:?} model {model}");
    let mut http = HttpModel::new(provider, api_key, model);
    if let Some(api_base) = api_base {
        http = http.with_api_base(api_base);
    }
    Arc::new(http)
}

fn api_key(provider: Provider) -> Option<String> {
    [API_KEY_ENV, provider.api_key_env()]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

/// Model used when no API key is available.
struct MissingKey {
    provider: Provider,
}

#[async_trait]
impl LanguageModel for MissingKey {
    async fn query(&self, _prompt: &str) -> mender_core::Result<String> {
        Err(MenderError::llm(format!(
            "No API key configured; set {API_KEY_ENV} or {}",
            self.provider.api_key_env()
        )))
    }
}

use std::env;

use anyhow::{Context, Result, bail};
use async_openai::{Client, config::OpenAIConfig};

use super::secrets::{API_KEY_ENV, ApiKeySource, lookup_api_key};
use crate::utils::trim_line;

pub const API_BASE: &str = "https://openrouter.ai/api/v1";

pub const MODEL_ENV: &str = "MODEL";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Everything the client needs, resolved once from the environment before
/// any network call.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl LlmConfig {
    pub fn from_sources() -> Result<Self> {
        let Some((api_key, _)) = lookup_api_key()? else {
            bail!(
                "{} not found in environment variables. Set it or run `simplifier llm --set <KEY>`.",
                API_KEY_ENV
            );
        };

        Ok(Self {
            api_key,
            api_base: API_BASE.to_string(),
            model: model_or_default(env::var(MODEL_ENV).ok()),
        })
    }
}

fn model_or_default(value: Option<String>) -> String {
    value
        .as_deref()
        .and_then(trim_line)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

pub fn initialize_client(config: &LlmConfig) -> Client<OpenAIConfig> {
    let openai_config = OpenAIConfig::new()
        .with_api_base(config.api_base.clone())
        .with_api_key(config.api_key.clone());

    Client::with_config(openai_config)
}

pub async fn test_configured_api_key() -> Result<ApiKeySource> {
    let Some((_, source)) = lookup_api_key()? else {
        bail!(
            "No API key configured. Set {} or run `simplifier llm --set <KEY>`.",
            API_KEY_ENV
        );
    };

    let config = LlmConfig::from_sources()?;
    let client = initialize_client(&config);
    healthcheck_client(&client).await?;
    Ok(source)
}

async fn healthcheck_client(client: &Client<OpenAIConfig>) -> Result<()> {
    client
        .models()
        .list()
        .await
        .context("Failed to validate API key with OpenRouter")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_or_default() {
        assert_eq!(model_or_default(None), DEFAULT_MODEL);
        assert_eq!(model_or_default(Some("   ".to_string())), DEFAULT_MODEL);
        assert_eq!(
            model_or_default(Some(" anthropic/claude-3.5-haiku ".to_string())),
            "anthropic/claude-3.5-haiku"
        );
    }
}

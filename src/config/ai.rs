// src/config/ai.rs
use std::env;

use crate::error::{BridgeError, Result};

pub const ENV_API_KEY: &str = "AI_API_KEY";
pub const ENV_BASE_URL: &str = "AI_BASE_URL";
pub const ENV_MODEL: &str = "AI_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

fn default_temperature() -> f32 {
    1.3
}
fn default_max_tokens() -> u32 {
    8192
}

/// Settings for the OpenAI-compatible script generator.
#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub model: String,
    /// Talk-show scripts want a lively sampler.
    pub temperature: f32,
    pub max_tokens: u32,
}

// Keep the key out of logs.
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key_len", &self.api_key.len())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    /// Read `AI_API_KEY` (required), `AI_BASE_URL` and `AI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| BridgeError::Config(format!("{ENV_API_KEY} environment variable is not set")))?;

        let mut cfg = Self::new(api_key);
        if let Some(base) = non_empty_var(ENV_BASE_URL) {
            cfg.base_url = base;
        }
        if let Some(model) = non_empty_var(ENV_MODEL) {
            cfg.model = model;
        }

        // Normalize base URL so endpoint joining never doubles the slash
        cfg.base_url = cfg.base_url.trim_end_matches('/').to_string();
        Ok(cfg)
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Script generation: the LLM collaborator that turns an extracted report
//! into a podcast script.

pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AiConfig;
use crate::error::{BridgeError, Result};
use crate::extract::ExtractedReport;

#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Produce a script for `report`. An empty answer is an error.
    async fn generate(&self, report: &ExtractedReport) -> Result<String>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynGenerator = Arc<dyn ScriptGenerator>;

/// OpenAI-compatible chat completions client (DeepSeek by default).
pub struct OpenAiScriptGenerator {
    http: reqwest::Client,
    cfg: AiConfig,
}

impl OpenAiScriptGenerator {
    pub fn new(cfg: AiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            // Long scripts take a while to sample.
            .timeout(Duration::from_secs(600))
            .build()?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AiConfig::from_env()?)
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ScriptGenerator for OpenAiScriptGenerator {
    async fn generate(&self, report: &ExtractedReport) -> Result<String> {
        let system = prompt::system_prompt();
        let user = prompt::user_prompt(report);
        let req = Req {
            model: &self.cfg.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &system,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
        };

        info!(model = %self.cfg.model, prompt_chars = user.chars().count(), "generating script");

        let resp = self
            .http
            .post(self.cfg.chat_completions_url())
            .bearer_auth(&self.cfg.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| BridgeError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BridgeError::Generation(format!(
                "provider returned {status}: {}",
                truncate(&body, 300)
            )));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| BridgeError::Generation(format!("bad response body: {e}")))?;

        let script = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if script.is_empty() {
            return Err(BridgeError::EmptyScript);
        }
        Ok(script)
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}

/// Returns a fixed script; useful for dry runs and tests.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    pub script: String,
}

impl StaticGenerator {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait]
impl ScriptGenerator for StaticGenerator {
    async fn generate(&self, _report: &ExtractedReport) -> Result<String> {
        if self.script.trim().is_empty() {
            return Err(BridgeError::EmptyScript);
        }
        Ok(self.script.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_generator_rejects_blank_script() {
        let report = ExtractedReport::default();
        assert_eq!(
            StaticGenerator::new("老张：早").generate(&report).await.unwrap(),
            "老张：早"
        );
        assert!(matches!(
            StaticGenerator::new("  ").generate(&report).await,
            Err(BridgeError::EmptyScript)
        ));
    }

    #[test]
    fn request_shape_matches_chat_completions() {
        let req = Req {
            model: "deepseek-chat",
            messages: vec![Msg {
                role: "user",
                content: "hi",
            }],
            temperature: 1.3,
            max_tokens: 8192,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "deepseek-chat");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["max_tokens"], 8192);
    }

    #[test]
    fn null_content_deserializes() {
        let r: Resp =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(r.choices[0].message.content.is_none());
    }
}

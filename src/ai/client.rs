use super::TextModel;
use crate::settings::AiSettings;
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
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

/// OpenAI-compatible `/chat/completions` client.
pub struct ChatCompletionsClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(settings: &AiSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent("dark-knight dashboard")
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", settings.endpoint.trim_end_matches('/')),
            model: settings.model.clone(),
            api_key,
        })
    }
}

impl TextModel for ChatCompletionsClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
        };
        let resp: ChatResponse = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("POST {}", self.url))?
            .error_for_status()?
            .json()
            .context("decoding chat completion")?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("chat completion had no content"))
    }
}

/// Stand-in used when AI is switched off or no key is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledModel {
    reason: String,
}

impl DisabledModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextModel for DisabledModel {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("AI disabled: {}", self.reason))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Build the configured model. Never fails; misconfiguration yields a
/// [`DisabledModel`] and a log line.
pub fn model_from_settings(settings: &AiSettings) -> Arc<dyn TextModel> {
    if !settings.enabled {
        return Arc::new(DisabledModel::new("turned off in settings"));
    }
    let key = match std::env::var(&settings.api_key_env) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            tracing::warn!(var = %settings.api_key_env, "no API key set; AI features disabled");
            return Arc::new(DisabledModel::new(format!("{} is not set", settings.api_key_env)));
        }
    };
    match ChatCompletionsClient::new(settings, key) {
        Ok(client) => {
            tracing::info!(endpoint = %settings.endpoint, model = %settings.model, "AI client ready");
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!("failed to create AI client: {e:#}");
            Arc::new(DisabledModel::new("client setup failed"))
        }
    }
}

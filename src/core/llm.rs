use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::config::LLMConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Text generation capability: continue an ordered transcript
///
/// Implementations return the completion for the last instruction in the
/// transcript. An empty string is a valid answer; transport and API failures
/// are reported through `Err`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn complete(&self, transcript: &[ChatMessage]) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
pub struct LLMClient {
    client: Client,
    api_key: String,
    config: LLMConfig,
}

impl LLMClient {
    pub fn new(api_key: String, config: LLMConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn wire_role(&self, role: Role) -> &str {
        match (role, self.config.system_role.as_deref()) {
            (Role::System, Some(alias)) => alias,
            _ => role.as_str(),
        }
    }
}

#[async_trait]
impl GenerationClient for LLMClient {
    async fn complete(&self, transcript: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: transcript
                .iter()
                .map(|m| WireMessage {
                    role: self.wire_role(m.role),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        const BASE_DELAY_MS: u64 = 1000;
        let attempts = self.config.max_retries.max(1);

        let mut last_error = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2_u64.pow(attempt - 1);
                tracing::warn!(
                    "[LLMClient] Retrying API call (attempt {}/{}) after {}ms delay",
                    attempt + 1,
                    attempts,
                    delay
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
            }

            let response_result = self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            let response = match response_result {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!("[LLMClient] HTTP request failed: {}", e);
                    last_error = Some(anyhow::anyhow!("HTTP request failed: {}", e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                tracing::warn!(
                    "[LLMClient] API returned error status {}: {}",
                    status,
                    error_text
                );
                last_error = Some(anyhow::anyhow!("API error {}: {}", status, error_text));
                continue;
            }

            let chat_response = match response.json::<ChatResponse>().await {
                Ok(cr) => cr,
                Err(e) => {
                    tracing::warn!("[LLMClient] Failed to decode response body: {}", e);
                    last_error = Some(anyhow::anyhow!("Response decode error: {}", e));
                    continue;
                }
            };

            return Ok(chat_response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default());
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("All retry attempts failed")))
    }
}

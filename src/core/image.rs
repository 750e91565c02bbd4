use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::config::ImageConfig;

/// Image generation capability
///
/// Returns the provider's raw JSON response. Its shape is not fixed; the
/// asset cache decides how to turn it into bytes.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value>;
}

/// fal.ai synchronous endpoint client
pub struct FalImageClient {
    client: Client,
    api_key: String,
    config: ImageConfig,
}

impl FalImageClient {
    pub fn new(api_key: String, config: ImageConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ImageGenerator for FalImageClient {
    async fn generate(&self, prompt: &str) -> Result<Value> {
        tracing::info!("[ImageClient] Generating image with prompt: '{}'", prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("[ImageClient] API returned error status {}: {}", status, error_text);
            return Err(anyhow::anyhow!("API error {}: {}", status, error_text));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| anyhow::anyhow!("Response decode error: {}", e))
    }
}

/// Stands in for a provider that could not be configured
///
/// Every call fails with the configuration problem, so callers that never
/// ask for images (page browsing) are unaffected.
pub struct UnconfiguredImageGenerator {
    reason: String,
}

impl UnconfiguredImageGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl ImageGenerator for UnconfiguredImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Value> {
        Err(anyhow::anyhow!("image generation unavailable: {}", self.reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> ImageConfig {
        ImageConfig {
            base_url,
            model: "fal-ai/flux/schnell".to_string(),
            quality_suffix: "high quality, detailed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_with_key_auth() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fal-ai/flux/schnell"))
            .and(header("authorization", "Key abc"))
            .and(body_json(json!({"prompt": "a red fox"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "images": [{"url": "https://cdn.example/fox.png"}]
            })))
            .mount(&mock_server)
            .await;

        let client = FalImageClient::new("abc".to_string(), config(mock_server.uri()));
        let value = client.generate("a red fox").await.unwrap();

        assert_eq!(value["images"][0]["url"], "https://cdn.example/fox.png");
    }

    #[tokio::test]
    async fn test_generate_surfaces_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let client = FalImageClient::new("abc".to_string(), config(mock_server.uri()));
        let err = client.generate("x").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_unconfigured_generator_reports_reason() {
        let images = UnconfiguredImageGenerator::new("FAL_KEY environment variable not set");
        let err = images.generate("a red fox").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "image generation unavailable: FAL_KEY environment variable not set"
        );
    }
}

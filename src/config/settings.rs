use anyhow::Result;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub image: ImageConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_retries: u32,
    /// Role name to send the system turn under, e.g. "developer" for reasoning models
    pub system_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub base_url: String,
    pub model: String,
    pub quality_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub scenarios_dir: PathBuf,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub default_scenario: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 16384)?
            .set_default("llm.temperature", 1.0)?
            .set_default("llm.max_retries", 3)?
            .set_default("image.base_url", "https://fal.run")?
            .set_default("image.model", "fal-ai/flux/schnell")?
            .set_default("image.quality_suffix", "high quality, detailed")?
            .set_default("storage.scenarios_dir", "prompts")?
            .set_default("storage.cache_dir", "image_cache")?
            .set_default("session.default_scenario", crate::scenario::DEFAULT_SCENARIO)?
            .set_default("logging.level", "info")
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }

    pub fn image_api_key() -> Result<String> {
        env::var("FAL_KEY").map_err(|_| anyhow::anyhow!("FAL_KEY environment variable not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_without_sources() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.session.default_scenario, "etherweave");
        assert_eq!(settings.storage.cache_dir, PathBuf::from("image_cache"));
        assert_eq!(settings.image.model, "fal-ai/flux/schnell");
        assert!(settings.llm.system_role.is_none());
    }
}

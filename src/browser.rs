//! Browser - one browsing session over the generation engines
//!
//! Information Hiding:
//! - Routing between page generation and the asset cache is internal
//! - Scenario switching always goes through the conversation engine
//! - Clients and stores are wired from settings in one place
//!
//! A `Browser` is a plain value. Run one per session; nothing here is global.

use crate::config::Settings;
use crate::core::{FalImageClient, ImageGenerator, LLMClient, UnconfiguredImageGenerator};
use crate::engine::{page, AssetCache, ConversationEngine};
use crate::error::Result;
use crate::scenario::{FileScenarioStore, ScenarioStore, ScenarioSummary, ScenarioTemplate};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// What a navigation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseOutcome {
    /// Generated HTML for a page path
    Page(String),
    /// Location of a cached image
    Asset(PathBuf),
}

pub fn is_asset_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Collapse leading slashes to exactly one
pub fn normalize_page_path(path: &str) -> String {
    format!("/{}", path.trim().trim_start_matches('/'))
}

pub struct Browser {
    engine: ConversationEngine,
    assets: AssetCache,
}

impl Browser {
    pub fn new(engine: ConversationEngine, assets: AssetCache) -> Self {
        Self { engine, assets }
    }

    /// Wire a session from settings, the file-backed scenario store and the HTTP clients
    ///
    /// Only the text generation key is required. Without an image key the
    /// session still serves pages; image paths fall through to page generation.
    pub async fn open(settings: &Settings, scenario: Option<&str>) -> anyhow::Result<Self> {
        let store = FileScenarioStore::open(&settings.storage.scenarios_dir)
            .await
            .context("Failed to open scenario store")?;
        let llm = LLMClient::new(Settings::api_key()?, settings.llm.clone());
        let images: Arc<dyn ImageGenerator> = match Settings::image_api_key() {
            Ok(key) => Arc::new(FalImageClient::new(key, settings.image.clone())),
            Err(e) => {
                tracing::warn!("[Browser] Image generation disabled: {}", e);
                Arc::new(UnconfiguredImageGenerator::new(e.to_string()))
            }
        };

        let engine = ConversationEngine::start(
            Arc::new(store),
            Arc::new(llm),
            settings.session.default_scenario.clone(),
            scenario,
            None,
        )
        .await;
        let assets = AssetCache::new(
            &settings.storage.cache_dir,
            images,
            settings.image.quality_suffix.clone(),
        )
        .await
        .context("Failed to create image cache")?;

        Ok(Self::new(engine, assets))
    }

    /// Serve one path: images come from the asset cache, everything else is generated
    ///
    /// If an image cannot be produced the path is handed to the page
    /// generator instead, so the session keeps going.
    pub async fn browse(&mut self, path: &str) -> Result<BrowseOutcome> {
        if is_asset_path(path) {
            let name = path.rsplit('/').next().unwrap_or(path);
            match self.assets.get_or_generate(name).await {
                Ok(asset) => return Ok(BrowseOutcome::Asset(asset)),
                Err(e) => {
                    tracing::warn!("[Browser] Error generating image for '{}': {}", path, e);
                }
            }
        }

        let html = self.engine.navigate(&normalize_page_path(path)).await?;
        Ok(BrowseOutcome::Page(html))
    }

    /// Generate a page and warm the cache for the images it references
    pub async fn browse_with_prefetch(
        &mut self,
        path: &str,
        concurrency: usize,
    ) -> Result<(String, Vec<(String, Result<PathBuf>)>)> {
        let html = self.engine.navigate(&normalize_page_path(path)).await?;
        let assets = self
            .assets
            .prefetch(page::image_sources(&html), concurrency)
            .await;
        Ok((html, assets))
    }

    /// Store a scenario and make it the active one
    pub async fn add_scenario(&mut self, template: ScenarioTemplate) -> Result<bool> {
        let name = template.name.clone();
        self.engine.store().add(template).await?;
        Ok(self.engine.switch_scenario(Some(&name), None).await)
    }

    pub async fn select_scenario(&mut self, name: &str) -> bool {
        self.engine.switch_scenario(Some(name), None).await
    }

    pub async fn use_description(&mut self, description: &str) -> bool {
        self.engine.switch_scenario(None, Some(description)).await
    }

    pub async fn current_scenario(&self) -> ScenarioSummary {
        if let Some(name) = self.engine.active_scenario() {
            if let Some(template) = self.engine.store().get(name).await {
                return template.summary();
            }
        }
        ScenarioSummary {
            name: "custom".to_string(),
            description: "Custom scenario".to_string(),
        }
    }

    pub async fn list_scenarios(&self) -> Vec<ScenarioSummary> {
        self.engine
            .store()
            .list_all()
            .await
            .iter()
            .map(ScenarioTemplate::summary)
            .collect()
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }
}

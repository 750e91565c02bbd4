//! File System Scenario Store
//!
//! Information Hiding:
//! - One JSON record per scenario, stored as {base_path}/{name}.json
//! - Records are read once at open and served from memory afterwards
//! - Seeding and corruption recovery are internal to `open`

use super::{defaults, ScenarioStore, ScenarioTemplate};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

pub struct FileScenarioStore {
    base_path: PathBuf,
    scenarios: RwLock<HashMap<String, ScenarioTemplate>>,
}

impl FileScenarioStore {
    /// Open the store, seeding the built-in scenarios if the directory holds no records
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;

        let store = Self {
            base_path,
            scenarios: RwLock::new(HashMap::new()),
        };

        let files = store.record_files().await?;
        if files.is_empty() {
            tracing::info!(
                "[ScenarioStore] No scenarios in {:?}, writing built-in defaults",
                store.base_path
            );
            for template in defaults::builtin_scenarios() {
                store.add(template).await?;
            }
        } else {
            let mut loaded = HashMap::new();
            for path in files {
                if let Some(template) = load_record(&path).await {
                    loaded.insert(template.name.clone(), template);
                }
            }
            tracing::debug!(
                "[ScenarioStore] Loaded {} scenarios from {:?}",
                loaded.len(),
                store.base_path
            );
            *store.scenarios.write().await = loaded;
        }

        Ok(store)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", name))
    }

    async fn record_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Parse one record; a corrupt record is logged and skipped
async fn load_record(path: &Path) -> Option<ScenarioTemplate> {
    let parsed = match fs::read_to_string(path).await {
        Ok(json) => serde_json::from_str::<ScenarioTemplate>(&json).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(template) if !template.name.trim().is_empty() => Some(template),
        Ok(_) => {
            tracing::warn!("[ScenarioStore] Skipping scenario {:?}: empty name", path);
            None
        }
        Err(e) => {
            tracing::warn!("[ScenarioStore] Error loading scenario {:?}: {}", path, e);
            None
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\'])
    {
        return Err(Error::Store(format!("invalid scenario name: {:?}", name)));
    }
    Ok(())
}

#[async_trait]
impl ScenarioStore for FileScenarioStore {
    async fn get(&self, name: &str) -> Option<ScenarioTemplate> {
        self.scenarios.read().await.get(name).cloned()
    }

    async fn add(&self, template: ScenarioTemplate) -> Result<()> {
        validate_name(&template.name)?;

        let path = self.record_path(&template.name);
        let json = serde_json::to_string_pretty(&template)?;
        fs::write(&path, json)
            .await
            .map_err(|e| Error::Store(format!("failed to write {:?}: {}", path, e)))?;

        tracing::debug!("[ScenarioStore] Saved scenario '{}' to {:?}", template.name, path);
        self.scenarios
            .write()
            .await
            .insert(template.name.clone(), template);
        Ok(())
    }

    async fn list_all(&self) -> Vec<ScenarioTemplate> {
        let mut all: Vec<_> = self.scenarios.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::DEFAULT_SCENARIO;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_directory_is_seeded() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();

        let names = store.names().await;
        assert_eq!(names.len(), defaults::builtin_scenarios().len());
        assert!(store.get(DEFAULT_SCENARIO).await.is_some());
        assert!(temp_dir.path().join("etherweave.json").exists());
    }

    #[tokio::test]
    async fn test_add_persists_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();

        store
            .add(ScenarioTemplate::new("steampunk", "Brass", "Gears everywhere"))
            .await
            .unwrap();
        store
            .add(ScenarioTemplate::new("steampunk", "Brass v2", "More gears"))
            .await
            .unwrap();

        let reopened = FileScenarioStore::open(temp_dir.path()).await.unwrap();
        let template = reopened.get("steampunk").await.unwrap();
        assert_eq!(template.description, "Brass v2");
        assert_eq!(template.scenario, "More gears");
    }

    #[tokio::test]
    async fn test_reopen_does_not_reseed_or_clobber() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();
            store
                .add(ScenarioTemplate::new("etherweave", "Mine", "Custom etherweave"))
                .await
                .unwrap();
            store
                .add(ScenarioTemplate::new("noir", "Rainy", "Detective web"))
                .await
                .unwrap();
        }

        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();
        let all = store.list_all().await;
        assert_eq!(all.len(), defaults::builtin_scenarios().len() + 1);
        assert_eq!(
            store.get("etherweave").await.unwrap().scenario,
            "Custom etherweave"
        );
    }

    #[tokio::test]
    async fn test_corrupt_record_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(
            temp_dir.path().join("partial.json"),
            r#"{"name": "partial", "description": "no scenario field"}"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("good.json"),
            r#"{"name": "good", "description": "ok", "scenario": "fine"}"#,
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();

        assert_eq!(store.names().await, vec!["good".to_string()]);
        assert!(store.get(DEFAULT_SCENARIO).await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();

        assert!(store.get("EtherWeave").await.is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileScenarioStore::open(temp_dir.path()).await.unwrap();

        let result = store
            .add(ScenarioTemplate::new("../escape", "x", "y"))
            .await;
        assert!(matches!(result, Err(Error::Store(_))));
    }
}

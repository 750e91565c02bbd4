//! In-Memory Scenario Store
//!
//! Suitable for tests and throwaway sessions. Data is lost when the process
//! terminates.

use super::{defaults, ScenarioStore, ScenarioTemplate};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub struct InMemoryScenarioStore {
    scenarios: RwLock<HashMap<String, ScenarioTemplate>>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self {
            scenarios: RwLock::new(HashMap::new()),
        }
    }

    /// Store pre-populated with the built-in scenarios
    pub fn with_defaults() -> Self {
        let scenarios = defaults::builtin_scenarios()
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        Self {
            scenarios: RwLock::new(scenarios),
        }
    }
}

impl Default for InMemoryScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScenarioStore for InMemoryScenarioStore {
    async fn get(&self, name: &str) -> Option<ScenarioTemplate> {
        self.scenarios.read().await.get(name).cloned()
    }

    async fn add(&self, template: ScenarioTemplate) -> Result<()> {
        tracing::debug!("[InMemoryScenarioStore] Saved scenario '{}'", template.name);
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

    #[tokio::test]
    async fn test_add_and_get() {
        let store = InMemoryScenarioStore::new();
        assert!(store.get("noir").await.is_none());

        store
            .add(ScenarioTemplate::new("noir", "Rainy", "Detective web"))
            .await
            .unwrap();

        assert_eq!(store.get("noir").await.unwrap().description, "Rainy");
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let store = InMemoryScenarioStore::with_defaults();
        let names = store.names().await;

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 4);
    }
}

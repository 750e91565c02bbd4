//! Scenario Store
//!
//! Information Hiding:
//! - Persistence format and layout hidden behind the store trait
//! - Seeding of the built-in scenarios happens inside each backend
//! - Corrupt records are recovered at load time and never reach callers

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod filesystem;
pub mod memory;

pub use filesystem::FileScenarioStore;
pub use memory::InMemoryScenarioStore;

/// Name of the scenario used when nothing else resolves
pub const DEFAULT_SCENARIO: &str = "etherweave";

/// Used only when the default scenario itself is missing from the store
pub const FALLBACK_SCENARIO_TEXT: &str = "A fictional alternative internet";

/// A named fictional-internet premise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioTemplate {
    pub name: String,
    pub description: String,
    pub scenario: String,
}

impl ScenarioTemplate {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        scenario: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            scenario: scenario.into(),
        }
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Name and short description, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: String,
}

/// Storage interface for scenario templates
///
/// Upserts are keyed by `name`, last write wins. Nothing is ever deleted.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Exact, case-sensitive lookup
    async fn get(&self, name: &str) -> Option<ScenarioTemplate>;

    /// Insert or replace by name
    async fn add(&self, template: ScenarioTemplate) -> Result<()>;

    /// All scenarios, sorted by name
    async fn list_all(&self) -> Vec<ScenarioTemplate>;

    async fn names(&self) -> Vec<String> {
        self.list_all().await.into_iter().map(|s| s.name).collect()
    }
}

//! Conversation Engine - one evolving transcript per browsing session
//!
//! Information Hiding:
//! - The transcript is owned here and only exposed read-only
//! - Scenario resolution and its fallbacks are internal
//! - Prompt wording lives in `prompts`
//!
//! The engine is not internally synchronized. Callers drive one engine per
//! session and serialize `navigate` and `switch_scenario` on it, which
//! `&mut self` already enforces for direct owners.

use super::prompts;
use crate::core::llm::{ChatMessage, GenerationClient, Role};
use crate::error::{Error, Result};
use crate::scenario::{ScenarioStore, FALLBACK_SCENARIO_TEXT};
use std::sync::Arc;

/// Where a resolved scenario description came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioSource {
    /// Found in the store under the requested name
    Named(String),
    /// The default scenario, used because nothing usable was requested
    /// (`requested` is the unknown name, if one was given)
    Fallback { requested: Option<String> },
    /// Free-text description supplied by the caller
    Custom,
    /// Literal text, used when even the default scenario is missing
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    pub description: String,
    pub source: ScenarioSource,
}

impl ResolvedScenario {
    /// Store name of the scenario in effect, if it has one
    pub fn scenario_name(&self, default_scenario: &str) -> Option<String> {
        match &self.source {
            ScenarioSource::Named(name) => Some(name.clone()),
            ScenarioSource::Fallback { .. } => Some(default_scenario.to_string()),
            ScenarioSource::Custom | ScenarioSource::Builtin => None,
        }
    }
}

pub struct ConversationEngine {
    store: Arc<dyn ScenarioStore>,
    client: Arc<dyn GenerationClient>,
    default_scenario: String,
    transcript: Vec<ChatMessage>,
    scenario_description: String,
    active_scenario: Option<String>,
}

impl ConversationEngine {
    /// Create an engine and seed its transcript from the requested scenario
    ///
    /// Resolution never fails: unknown names and missing arguments fall back
    /// to `default_scenario`.
    pub async fn start(
        store: Arc<dyn ScenarioStore>,
        client: Arc<dyn GenerationClient>,
        default_scenario: impl Into<String>,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        let mut engine = Self {
            store,
            client,
            default_scenario: default_scenario.into(),
            transcript: Vec::new(),
            scenario_description: String::new(),
            active_scenario: None,
        };

        let resolved = engine.resolve_scenario(name, description).await;
        engine.apply(resolved);
        engine
    }

    /// Pick the scenario text for a name and/or free-text description
    ///
    /// Order: a known name, then a free-text description, then the default
    /// scenario, then a literal fallback. An unknown name is reported once.
    pub async fn resolve_scenario(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> ResolvedScenario {
        let mut requested = None;

        if let Some(name) = name {
            if let Some(template) = self.store.get(name).await {
                return ResolvedScenario {
                    description: template.scenario,
                    source: ScenarioSource::Named(template.name),
                };
            }
            tracing::warn!(
                "[ConversationEngine] Scenario '{}' not found. Using default scenario.",
                name
            );
            requested = Some(name.to_string());
        } else if let Some(description) = description {
            return ResolvedScenario {
                description: description.to_string(),
                source: ScenarioSource::Custom,
            };
        }

        self.default_resolution(requested).await
    }

    async fn default_resolution(&self, requested: Option<String>) -> ResolvedScenario {
        match self.store.get(&self.default_scenario).await {
            Some(template) => ResolvedScenario {
                description: template.scenario,
                source: ScenarioSource::Fallback { requested },
            },
            None => ResolvedScenario {
                description: FALLBACK_SCENARIO_TEXT.to_string(),
                source: ScenarioSource::Builtin,
            },
        }
    }

    /// Reset the transcript to a single system turn for `scenario_description`
    pub fn initialize(&mut self, scenario_description: impl Into<String>) {
        self.scenario_description = scenario_description.into();
        self.active_scenario = None;
        self.transcript = vec![ChatMessage::system(prompts::system_prompt(
            &self.scenario_description,
        ))];
    }

    fn apply(&mut self, resolved: ResolvedScenario) {
        let name = resolved.scenario_name(&self.default_scenario);
        self.initialize(resolved.description);
        self.active_scenario = name;
    }

    /// Generate the page for `path`, keeping the exchange in the transcript
    ///
    /// On success the transcript grows by exactly one user and one assistant
    /// turn. On failure it is left as it was before the call.
    pub async fn navigate(&mut self, path: &str) -> Result<String> {
        self.transcript
            .push(ChatMessage::user(prompts::navigation_prompt(path)));

        tracing::info!(
            "[ConversationEngine] Generating page for '{}' ({} turns of context)",
            path,
            self.transcript.len()
        );

        match self.client.complete(&self.transcript).await {
            Ok(html) => {
                self.transcript.push(ChatMessage::assistant(html.clone()));
                tracing::info!(
                    "[ConversationEngine] Generated page for '{}' ({} bytes)",
                    path,
                    html.len()
                );
                Ok(html)
            }
            Err(e) => {
                self.transcript.pop();
                Err(Error::Generation(e))
            }
        }
    }

    /// Switch to another scenario, discarding the whole transcript
    ///
    /// Returns `false` and leaves the session untouched when `name` is not in
    /// the store, or when neither a name nor a description is given.
    pub async fn switch_scenario(&mut self, name: Option<&str>, description: Option<&str>) -> bool {
        let resolved = match (name, description) {
            (Some(name), _) => match self.store.get(name).await {
                Some(template) => ResolvedScenario {
                    description: template.scenario,
                    source: ScenarioSource::Named(template.name),
                },
                None => {
                    tracing::warn!("[ConversationEngine] Scenario '{}' not found.", name);
                    return false;
                }
            },
            (None, Some(description)) if !description.trim().is_empty() => ResolvedScenario {
                description: description.to_string(),
                source: ScenarioSource::Custom,
            },
            _ => return false,
        };

        tracing::info!(
            "[ConversationEngine] Switching scenario to {}",
            name.unwrap_or("custom description")
        );
        self.apply(resolved);
        true
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    pub fn scenario_description(&self) -> &str {
        &self.scenario_description
    }

    /// Name of the active stored scenario; `None` for a free-text description
    pub fn active_scenario(&self) -> Option<&str> {
        self.active_scenario.as_deref()
    }

    pub fn store(&self) -> &Arc<dyn ScenarioStore> {
        &self.store
    }

    /// Number of completed page generations in the current transcript
    pub fn pages_generated(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{InMemoryScenarioStore, ScenarioTemplate, DEFAULT_SCENARIO};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every call with a numbered page and records the transcripts it saw
    struct ScriptedClient {
        calls: Mutex<Vec<Vec<ChatMessage>>>,
        fail: bool,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail: false }
        }

        fn failing() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail: true }
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn complete(&self, transcript: &[ChatMessage]) -> anyhow::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(transcript.to_vec());
            if self.fail {
                anyhow::bail!("upstream unavailable");
            }
            Ok(format!("<!DOCTYPE html><p>page {}</p>", calls.len()))
        }
    }

    /// Formatted log output collected from a thread-local subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn count(&self, needle: &str) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap()).matches(needle).count()
        }

        fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    async fn engine_with(client: Arc<ScriptedClient>, name: Option<&str>) -> ConversationEngine {
        let store: Arc<dyn ScenarioStore> = Arc::new(InMemoryScenarioStore::with_defaults());
        ConversationEngine::start(store, client, DEFAULT_SCENARIO, name, None).await
    }

    #[tokio::test]
    async fn test_start_seeds_single_system_turn() {
        let engine = engine_with(Arc::new(ScriptedClient::new()), None).await;

        assert_eq!(engine.turn_count(), 1);
        assert_eq!(engine.transcript()[0].role, Role::System);
        assert_eq!(engine.active_scenario(), Some(DEFAULT_SCENARIO));
        assert!(engine.transcript()[0].content.contains("EtherWeave"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_name_falls_back_to_default() {
        let engine = engine_with(Arc::new(ScriptedClient::new()), None).await;
        let default_text = engine.store().get(DEFAULT_SCENARIO).await.unwrap().scenario;

        for name in ["nope", "", "ETHERWEAVE", "cyber punk"] {
            let resolved = engine.resolve_scenario(Some(name), Some("ignored")).await;
            assert_eq!(resolved.description, default_text);
            assert_eq!(
                resolved.source,
                ScenarioSource::Fallback { requested: Some(name.to_string()) }
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_name_logs_one_not_found_warning() {
        let logs = CapturedLogs::default();
        let _subscriber = logs.install();

        let engine = engine_with(Arc::new(ScriptedClient::new()), Some("atlantis")).await;
        assert_eq!(logs.count("not found"), 1);
        assert_eq!(logs.count("'atlantis'"), 1);
        assert_eq!(engine.active_scenario(), Some(DEFAULT_SCENARIO));

        for name in ["nope", "ETHERWEAVE"] {
            logs.clear();
            engine.resolve_scenario(Some(name), None).await;
            assert_eq!(logs.count("not found"), 1);
            assert_eq!(logs.count("WARN"), 1);
        }

        logs.clear();
        engine.resolve_scenario(Some("cyberpunk"), None).await;
        engine.resolve_scenario(None, None).await;
        assert_eq!(logs.count("not found"), 0);
    }

    #[tokio::test]
    async fn test_resolve_order() {
        let engine = engine_with(Arc::new(ScriptedClient::new()), None).await;

        let named = engine.resolve_scenario(Some("cyberpunk"), Some("free text")).await;
        assert_eq!(named.source, ScenarioSource::Named("cyberpunk".to_string()));
        assert!(named.description.contains("NeoNet"));

        let custom = engine.resolve_scenario(None, Some("free text")).await;
        assert_eq!(custom.source, ScenarioSource::Custom);
        assert_eq!(custom.description, "free text");

        let neither = engine.resolve_scenario(None, None).await;
        assert_eq!(neither.source, ScenarioSource::Fallback { requested: None });
    }

    #[tokio::test]
    async fn test_resolve_without_default_uses_literal_text() {
        let store: Arc<dyn ScenarioStore> = Arc::new(InMemoryScenarioStore::new());
        let engine = ConversationEngine::start(
            store,
            Arc::new(ScriptedClient::new()),
            DEFAULT_SCENARIO,
            Some("missing"),
            None,
        )
        .await;

        assert_eq!(engine.scenario_description(), FALLBACK_SCENARIO_TEXT);
        assert_eq!(engine.active_scenario(), None);
    }

    #[tokio::test]
    async fn test_navigate_appends_user_then_assistant() {
        let client = Arc::new(ScriptedClient::new());
        let mut engine = engine_with(client.clone(), None).await;

        for (i, path) in ["/com/news/main", "/org/guild/members", "/"].iter().enumerate() {
            let before = engine.turn_count();
            let html = engine.navigate(path).await.unwrap();

            assert_eq!(engine.turn_count(), before + 2);
            let user = &engine.transcript()[before];
            let assistant = &engine.transcript()[before + 1];
            assert_eq!(user.role, Role::User);
            assert!(user.content.contains(&format!("\"{}\"", path)));
            assert_eq!(assistant.role, Role::Assistant);
            assert_eq!(assistant.content, html);
            assert_eq!(engine.pages_generated(), i + 1);
        }

        // the client always sees the full history, ending with the new request
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[2].len(), 6);
        assert_eq!(calls[2].last().unwrap().role, Role::User);
    }

    #[tokio::test]
    async fn test_navigate_failure_propagates_and_keeps_transcript() {
        let mut engine = engine_with(Arc::new(ScriptedClient::failing()), None).await;

        let err = engine.navigate("/com/news/main").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(engine.turn_count(), 1);
    }

    #[tokio::test]
    async fn test_switch_scenario_resets_transcript() {
        let mut engine = engine_with(Arc::new(ScriptedClient::new()), None).await;
        engine.navigate("/com/news/main").await.unwrap();

        assert!(engine.switch_scenario(Some("solarpunk"), None).await);
        assert_eq!(engine.turn_count(), 1);
        assert_eq!(engine.active_scenario(), Some("solarpunk"));
        assert!(engine.transcript()[0].content.contains("Flourish Network"));

        assert!(engine.switch_scenario(None, Some("A web run by cats")).await);
        assert_eq!(engine.turn_count(), 1);
        assert_eq!(engine.active_scenario(), None);
        assert!(engine.transcript()[0].content.contains("A web run by cats"));
    }

    #[tokio::test]
    async fn test_switch_scenario_unknown_or_empty_is_noop() {
        let mut engine = engine_with(Arc::new(ScriptedClient::new()), Some("cyberpunk")).await;
        engine.navigate("/net/grid").await.unwrap();

        assert!(!engine.switch_scenario(Some("atlantis"), None).await);
        assert!(!engine.switch_scenario(None, None).await);
        assert!(!engine.switch_scenario(None, Some("   ")).await);

        assert_eq!(engine.turn_count(), 3);
        assert_eq!(engine.active_scenario(), Some("cyberpunk"));
    }

    #[tokio::test]
    async fn test_switch_to_added_scenario_then_navigate() {
        let client = Arc::new(ScriptedClient::new());
        let mut engine = engine_with(client.clone(), None).await;
        let steam_text = "Brass pneumatic tubes carry punched cards between guild halls.";

        engine
            .store()
            .add(ScenarioTemplate::new("steampunk", "Victorian steam web", steam_text))
            .await
            .unwrap();
        assert!(engine.switch_scenario(Some("steampunk"), None).await);

        engine.navigate("/com/news/main").await.unwrap();

        let calls = client.calls.lock().unwrap();
        let sent = calls.last().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].content.contains(steam_text));
        assert!(!sent[0].content.contains("EtherWeave"));
        assert!(sent[1].content.contains("\"/com/news/main\""));
    }
}

//! Session-scoped generation engines

pub mod assets;
pub mod conversation;
pub mod page;
pub mod prompts;

pub use assets::{AssetCache, ImagePayload};
pub use conversation::{ConversationEngine, ResolvedScenario, ScenarioSource};

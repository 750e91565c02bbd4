//! Altnet - scenario-conditioned generative browsing
//!
//! This library provides the session-scoped engines behind a browsable
//! alternative internet: a conversation engine that keeps page generation
//! coherent across navigations, and a write-once image cache keyed by
//! descriptive file names.

pub mod browser;
mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod scenario;
pub mod utils;

pub mod cli;

pub use browser::{BrowseOutcome, Browser};
pub use config::Settings;
pub use error::{Error, Result};

pub use engine::{AssetCache, ConversationEngine};
pub use scenario::{ScenarioStore, ScenarioSummary, ScenarioTemplate};

mod settings;

pub use settings::{ImageConfig, LLMConfig, Settings};

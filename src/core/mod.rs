//! External generation capabilities and their HTTP clients

pub mod image;
pub mod llm;

pub use image::{FalImageClient, ImageGenerator, UnconfiguredImageGenerator};
pub use llm::{ChatMessage, GenerationClient, LLMClient, Role};

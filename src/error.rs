//! Error types for the generation and cache engines
//!
//! Scenario lookup misses and corrupt scenario records are recovered where
//! they happen and never show up here. Everything in this enum is a hard
//! failure the caller has to decide about.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The text generation capability failed or could not be reached
    ///
    /// The cause is part of the message, not a `source`, so error chains
    /// print it once.
    #[error("page generation failed: {0:#}")]
    Generation(anyhow::Error),

    /// The image generation capability failed before returning a response
    #[error("image generation failed: {0:#}")]
    ImageGeneration(anyhow::Error),

    /// The image response matched none of the known shapes
    #[error("unrecognized image response format: {0}")]
    AssetFormatUnrecognized(String),

    /// Downloading a remote image returned a non-success status
    #[error("failed to fetch image from {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    #[error("invalid asset identifier: {0:?}")]
    InvalidAssetIdentifier(String),

    /// Persisting a scenario record failed
    #[error("scenario store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_cause_is_printed_once() {
        let err = Error::Generation(anyhow::anyhow!("upstream unavailable").context("chat call"));

        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(
            err.to_string(),
            "page generation failed: chat call: upstream unavailable"
        );

        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chained.matches("upstream unavailable").count(), 1);
    }

    #[test]
    fn test_image_generation_message() {
        let err = Error::ImageGeneration(anyhow::anyhow!("FAL_KEY environment variable not set"));
        assert_eq!(
            err.to_string(),
            "image generation failed: FAL_KEY environment variable not set"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}

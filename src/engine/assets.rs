//! Asset Cache Engine - write-once image cache keyed by file name
//!
//! Information Hiding:
//! - On-disk layout is {cache_root}/{identifier}, existence is the only index
//! - Provider response shapes are decoded once at the boundary into `ImagePayload`
//! - Concurrent misses for one identifier share a lock and a single generation

use crate::core::image::ImageGenerator;
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;

/// Shorter prompts get a generic qualifier prepended
const MIN_PROMPT_CHARS: usize = 10;
const SHORT_PROMPT_PREFIX: &str = "Detailed illustration of ";
const DEFAULT_EXTENSION: &str = "png";

/// Byte offset of the extension dot, ignoring leading dots (".hidden" has none)
fn extension_dot(name: &str) -> Option<usize> {
    let first_real = name.find(|c: char| c != '.')?;
    let dot = name.rfind('.')?;
    (dot > first_real).then_some(dot)
}

/// A trailing dot counts as an (empty) extension, so `"foo."` is kept as is
fn has_extension(name: &str) -> bool {
    extension_dot(name).is_some()
}

/// Turn a descriptive file name into an image prompt
///
/// `"ancient-mystic-portal.jpg"` becomes `"ancient mystic portal"`; results
/// under ten characters are prefixed with `"Detailed illustration of "`.
pub fn prompt_from_identifier(identifier: &str) -> String {
    let stem = match extension_dot(identifier) {
        Some(dot) => &identifier[..dot],
        None => identifier,
    };

    let words = stem.replace(['-', '_'], " ");
    let prompt = words.split_whitespace().collect::<Vec<_>>().join(" ");

    if prompt.chars().count() < MIN_PROMPT_CHARS {
        format!("{}{}", SHORT_PROMPT_PREFIX, prompt)
    } else {
        prompt
    }
}

/// Validate an identifier and give it the default extension if it has none
pub fn normalize_identifier(identifier: &str) -> Result<String> {
    let trimmed = identifier.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || identifier.contains(['/', '\\', '\0'])
    {
        return Err(Error::InvalidAssetIdentifier(identifier.to_string()));
    }

    if has_extension(identifier) {
        Ok(identifier.to_string())
    } else {
        Ok(format!("{}.{}", identifier, DEFAULT_EXTENSION))
    }
}

/// MIME type for a cached asset, decided by its extension
pub fn media_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    }
}

/// One image as returned by the generation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Hosted image to download
    RemoteUrl(String),
    /// `data:<mime>;base64,<payload>` style string
    InlineBase64WithHeader(String),
    /// Bare base64
    RawBase64(String),
}

impl ImagePayload {
    /// Classify a provider response
    ///
    /// Accepts an `images` collection (only the first entry is used; a single
    /// non-list entry is treated as a one-element collection) or a top-level
    /// `image` base64 string. Anything else is rejected.
    pub fn from_response(response: &Value) -> Result<Self> {
        if let Some(images) = response.get("images") {
            let entry = match images {
                Value::Array(entries) => entries.first().ok_or_else(|| {
                    Error::AssetFormatUnrecognized("empty images collection".to_string())
                })?,
                other => other,
            };
            return Self::from_entry(entry);
        }

        match response.get("image") {
            Some(Value::String(data)) => Ok(Self::RawBase64(data.clone())),
            Some(other) => Err(Error::AssetFormatUnrecognized(format!(
                "'image' field is not a string: {}",
                kind(other)
            ))),
            None => Err(Error::AssetFormatUnrecognized(format!(
                "no 'images' or 'image' field in {} response",
                kind(response)
            ))),
        }
    }

    fn from_entry(entry: &Value) -> Result<Self> {
        match entry {
            Value::Object(map) => match map.get("url") {
                Some(Value::String(url)) => Ok(Self::RemoteUrl(url.clone())),
                _ => Err(Error::AssetFormatUnrecognized(
                    "image entry object has no 'url' string".to_string(),
                )),
            },
            Value::String(data) if data.contains(',') => {
                Ok(Self::InlineBase64WithHeader(data.clone()))
            }
            Value::String(data) => Ok(Self::RawBase64(data.clone())),
            other => Err(Error::AssetFormatUnrecognized(format!(
                "unsupported image entry: {}",
                kind(other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

type InFlightMap = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// One caller's claim on an identifier's generation lock
///
/// Dropping the claim (on completion or when the caller's future is
/// cancelled) gives up the shared lock and removes the map entry once no
/// other caller holds it.
struct InFlight<'a> {
    map: &'a InFlightMap,
    name: String,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> InFlight<'a> {
    fn claim(map: &'a InFlightMap, name: &str) -> Self {
        let mut in_flight = map.lock().unwrap_or_else(|e| e.into_inner());
        let lock = in_flight.entry(name.to_string()).or_default().clone();
        Self {
            map,
            name: name.to_string(),
            lock,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.map.lock().unwrap_or_else(|e| e.into_inner());
        // release our handle under the map lock so counts seen here are exact
        drop(std::mem::take(&mut self.lock));
        if in_flight
            .get(&self.name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            in_flight.remove(&self.name);
        }
    }
}

pub struct AssetCache {
    cache_root: PathBuf,
    generator: Arc<dyn ImageGenerator>,
    http: reqwest::Client,
    quality_suffix: String,
    in_flight: InFlightMap,
}

impl AssetCache {
    pub async fn new(
        cache_root: impl Into<PathBuf>,
        generator: Arc<dyn ImageGenerator>,
        quality_suffix: impl Into<String>,
    ) -> Result<Self> {
        let cache_root = cache_root.into();
        fs::create_dir_all(&cache_root).await?;

        Ok(Self {
            cache_root,
            generator,
            http: reqwest::Client::new(),
            quality_suffix: quality_suffix.into(),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Path of a cached asset, generating it first on a miss
    pub async fn get_or_generate(&self, identifier: &str) -> Result<PathBuf> {
        let name = normalize_identifier(identifier)?;
        let path = self.cache_root.join(&name);

        if fs::try_exists(&path).await? {
            tracing::debug!("[AssetCache] Using cached image: {:?}", path);
            return Ok(path);
        }

        let claim = InFlight::claim(&self.in_flight, &name);
        let _guard = claim.lock.lock().await;

        // a concurrent miss may have finished while we waited
        if fs::try_exists(&path).await? {
            tracing::debug!("[AssetCache] Image {:?} generated by a concurrent request", path);
            return Ok(path);
        }
        self.generate_into(&name, path).await
    }

    /// Cached asset as a `data:` URI
    pub async fn as_inline_data(&self, identifier: &str) -> Result<String> {
        let path = self.get_or_generate(identifier).await?;
        let bytes = fs::read(&path).await?;

        Ok(format!(
            "data:{};base64,{}",
            media_type(&path),
            BASE64_STANDARD.encode(bytes)
        ))
    }

    /// Warm the cache for many identifiers, at most `concurrency` at a time
    pub async fn prefetch(
        &self,
        identifiers: Vec<String>,
        concurrency: usize,
    ) -> Vec<(String, Result<PathBuf>)> {
        stream::iter(identifiers)
            .map(|id| async move {
                let result = self.get_or_generate(&id).await;
                (id, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }

    async fn generate_into(&self, name: &str, path: PathBuf) -> Result<PathBuf> {
        let prompt = prompt_from_identifier(name);
        let enhanced = if self.quality_suffix.is_empty() {
            prompt
        } else {
            format!("{}, {}", prompt, self.quality_suffix)
        };
        tracing::info!("[AssetCache] Generating image for: {}", enhanced);

        let response = self
            .generator
            .generate(&enhanced)
            .await
            .map_err(Error::ImageGeneration)?;
        let payload = ImagePayload::from_response(&response)?;
        let bytes = self.payload_bytes(payload).await?;

        let tmp = self
            .cache_root
            .join(format!(".{}.{}.tmp", name, std::process::id()));
        write_atomically(&tmp, &path, &bytes).await?;

        tracing::info!("[AssetCache] Cached {} bytes at {:?}", bytes.len(), path);
        Ok(path)
    }

    async fn payload_bytes(&self, payload: ImagePayload) -> Result<Vec<u8>> {
        match payload {
            ImagePayload::RemoteUrl(url) => self.download(&url).await,
            ImagePayload::InlineBase64WithHeader(data) => {
                let encoded = data.split_once(',').map(|(_, b)| b).unwrap_or_default();
                Ok(BASE64_STANDARD.decode(encoded.trim())?)
            }
            ImagePayload::RawBase64(data) => Ok(BASE64_STANDARD.decode(data.trim())?),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("[AssetCache] Downloading image from {}", url);

        let fetch_error = |reason: String| Error::AssetFetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Write through a temp file and rename into place; the temp file never outlives a failure
async fn write_atomically(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let written = match fs::write(tmp, bytes).await {
        Ok(()) => fs::rename(tmp, path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = fs::remove_file(tmp).await;
    }
    written
}

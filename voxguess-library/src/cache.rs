//! Per-URL decode cache
//!
//! Append-only: a URL is fetched and decoded at most once, and a failed
//! load leaves no entry so a later attempt retries from scratch.

use crate::decode::{ClipDecoder, DecodeError, DecodedClip};
use crate::fetch::ByteSource;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ClipCache {
    source: Box<dyn ByteSource + Send>,
    decoder: ClipDecoder,
    clips: HashMap<String, Arc<DecodedClip>>,
}

impl ClipCache {
    pub fn new(source: Box<dyn ByteSource + Send>, decoder: ClipDecoder) -> Self {
        Self {
            source,
            decoder,
            clips: HashMap::new(),
        }
    }

    /// Fetch and decode `url`, or return the cached clip. Idempotent:
    /// repeat calls hand back the same `Arc` without touching the
    /// byte source again.
    pub fn load(&mut self, url: &str) -> Result<Arc<DecodedClip>, DecodeError> {
        if let Some(clip) = self.clips.get(url) {
            return Ok(clip.clone());
        }

        let bytes = self.source.fetch(url).map_err(|e| DecodeError::Fetch {
            url: url.to_string(),
            source: e,
        })?;
        let clip = self.decoder.decode(url, bytes)?;
        tracing::debug!(
            url,
            secs = clip.duration_secs,
            "decoded clip"
        );
        self.clips.insert(url.to_string(), clip.clone());
        Ok(clip)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.clips.contains_key(url)
    }
}

//! Raw byte fetching for clip URLs
//!
//! Clips are addressed by URL; http(s) goes through reqwest, anything
//! else is treated as a filesystem path so local asset folders work
//! without a server.

use std::path::Path;
use thiserror::Error;

/// Errors from fetching raw clip bytes
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of raw encoded bytes for a URL
pub trait ByteSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Default source: HTTP(S) via reqwest, plain paths via the filesystem.
pub struct UrlByteSource {
    client: reqwest::blocking::Client,
}

impl Default for UrlByteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlByteSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ByteSource for UrlByteSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let bytes = response
                .bytes()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            Ok(std::fs::read(Path::new(path))?)
        }
    }
}

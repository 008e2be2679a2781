//! Source document retrieval.
//!
//! This module provides:
//! - `DocumentFetcher`, the seam the generator fetches through
//! - `HttpFetcher`, a blocking `reqwest` client (single attempt, no retries)
//! - `FileFetcher`, reading local paths
//! - Transparent gzip decompression of `1f 8b` bodies
//!
//! Fetch failures never abort a run: [`fetch_documents`] logs them and
//! substitutes an empty document.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, Result};

/// User agent sent with every download; some list hosts reject bare clients.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Default download timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that turns a source location into document text.
pub trait DocumentFetcher {
    /// Fetch one document.
    fn fetch(&self, location: &str) -> Result<String>;
}

/// Fetches documents over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        log::info!("Downloading: {}", location);

        let response = self.client.get(location).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes()?;
        decode_body(&body)
    }
}

/// Reads documents from the local filesystem.
///
/// Relative locations are resolved against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    /// Create a fetcher resolving paths as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher resolving relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location.strip_prefix("file://").unwrap_or(location));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

impl DocumentFetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        let path = self.resolve(location);
        log::debug!("Reading: {:?}", path);
        let raw = fs::read(&path)?;
        decode_body(&raw)
    }
}

/// Check if data is gzip compressed.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Decompress if needed and decode as UTF-8, replacing invalid sequences.
/// A leading byte-order mark is removed.
pub fn decode_body(raw: &[u8]) -> Result<String> {
    let text = if is_gzip(raw) {
        let mut decoder = GzDecoder::new(raw);
        let mut data = Vec::new();
        decoder.read_to_end(&mut data)?;
        log::debug!(
            "Decompressed {} bytes (compressed: {} bytes)",
            data.len(),
            raw.len()
        );
        String::from_utf8_lossy(&data).into_owned()
    } else {
        String::from_utf8_lossy(raw).into_owned()
    };

    match text.strip_prefix('\u{feff}') {
        Some(rest) => Ok(rest.to_string()),
        None => Ok(text),
    }
}

/// Fetch every location in order. A failed fetch yields an empty document.
pub fn fetch_documents<F: DocumentFetcher + ?Sized>(fetcher: &F, locations: &[String]) -> Vec<String> {
    locations
        .iter()
        .map(|location| match fetcher.fetch(location) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Error downloading {}: {}", location, e);
                String::new()
            }
        })
        .collect()
}

/// Check if every document is empty or whitespace.
pub fn all_empty<S: AsRef<str>>(documents: &[S]) -> bool {
    documents.iter().all(|d| d.as_ref().trim().is_empty())
}

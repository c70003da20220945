//! Replays a browser HAR capture through a [`NetworkTap`].
//!
//! A HAR file is the JSON network log browsers export from their developer
//! tools. Each entry is fed to the tap in log order, the way the page issued
//! it: open, set headers, dispatch, complete.

use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;

use crate::observer::{NetworkTap, PendingRequest};

#[derive(Debug, Deserialize)]
pub struct HarFile {
    pub log: HarLog,
}

#[derive(Debug, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarEntry {
    pub request: HarRequest,
    pub response: HarResponse,
}

#[derive(Debug, Deserialize)]
pub struct HarRequest {
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
pub struct HarHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct HarResponse {
    pub status: u16,
    #[serde(default)]
    pub content: HarContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct HarContent {
    pub text: Option<String>,
    pub encoding: Option<String>,
}

impl HarFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read HAR file {}", path.display()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents).context("failed to parse HAR file")
    }

    /// Feeds every entry to `tap`, in capture order.
    pub fn replay(&self, tap: &impl NetworkTap) {
        for entry in &self.log.entries {
            let mut request = PendingRequest::new();
            tap.on_open(&mut request, &entry.request.url);
            for header in &entry.request.headers {
                tap.on_header_set(&mut request, &header.name, &header.value);
            }
            let Some(handle) = tap.on_dispatch(&request) else {
                continue;
            };
            let content = &entry.response.content;
            if content.encoding.as_deref() == Some("base64") {
                warn!("Skipping base64-encoded response body of {}", entry.request.url);
                continue;
            }
            handle.on_complete(entry.response.status, content.text.as_deref().unwrap_or_default());
        }
        info!("Replayed {} captured requests", self.log.entries.len());
    }
}

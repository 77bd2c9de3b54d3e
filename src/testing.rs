use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::{Result, eyre};

use crate::youtube::{Extractor, RawListing};

/// In-memory stand-in for yt-dlp that records how it was driven
#[derive(Default)]
pub struct FakeExtractor {
    files: Vec<(String, String)>,
    listing: Option<serde_json::Value>,
    failure: Option<String>,
    workdirs: Mutex<Vec<PathBuf>>,
    listing_calls: Mutex<Vec<(String, Option<u32>)>>,
}

impl FakeExtractor {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files.iter().map(|(n, c)| (n.to_string(), c.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn with_listing(listing: serde_json::Value) -> Self {
        Self {
            listing: Some(listing),
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn workdirs(&self) -> Vec<PathBuf> {
        self.workdirs.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> Vec<(String, Option<u32>)> {
        self.listing_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn fetch_subtitles(&self, _video_id: &str, workdir: &Path) -> Result<()> {
        self.workdirs.lock().unwrap().push(workdir.to_path_buf());
        if let Some(message) = &self.failure {
            return Err(eyre!("{message}"));
        }
        for (name, content) in &self.files {
            std::fs::write(workdir.join(name), content)?;
        }
        Ok(())
    }

    async fn list_entries(&self, url: &str, max_entries: Option<u32>) -> Result<RawListing> {
        self.listing_calls.lock().unwrap().push((url.to_string(), max_entries));
        if let Some(message) = &self.failure {
            return Err(eyre!("{message}"));
        }
        let value = self.listing.clone().unwrap_or_else(|| serde_json::json!({}));
        Ok(serde_json::from_value(value)?)
    }
}

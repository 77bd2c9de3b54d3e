use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Deserializer};

/// Flat playlist/channel listing as reported by `yt-dlp --dump-single-json`
#[derive(Debug, Default, Deserialize)]
pub struct RawListing {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEntry {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnails: Vec<RawThumbnail>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawThumbnail {
    pub url: String,
}

/// yt-dlp writes `null` for lists it could not fill
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The external scraper the orchestrator drives
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Write authored and auto-generated subtitle files for a video into `workdir`
    async fn fetch_subtitles(&self, video_id: &str, workdir: &Path) -> Result<()>;

    /// Flat, non-recursive listing of a playlist or channel tab
    async fn list_entries(&self, url: &str, max_entries: Option<u32>) -> Result<RawListing>;
}

/// `yt-dlp` invoked as a child process
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    sub_langs: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>, sub_langs: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            sub_langs: sub_langs.into(),
        }
    }

    fn subtitle_args(&self, video_id: &str, workdir: &Path) -> Vec<String> {
        let output_template = workdir.join("%(id)s");
        vec![
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            self.sub_langs.clone(),
            "--sub-format".to_string(),
            "srt/vtt/best".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "-o".to_string(),
            output_template.to_string_lossy().to_string(),
            watch_url(video_id),
        ]
    }

    fn listing_args(url: &str, max_entries: Option<u32>) -> Vec<String> {
        let mut args = vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
        ];
        if let Some(max) = max_entries {
            args.push("--playlist-end".to_string());
            args.push(max.to_string());
        }
        args.push(url.to_string());
        args
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = tokio::process::Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "{} not found. Install it to enable extraction:\n  \
                     pip install yt-dlp\n  \
                     or: brew install yt-dlp",
                    self.binary.display()
                );
            }
            Err(e) => bail!("failed to run {}: {e}", self.binary.display()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("yt-dlp exited with status {}: {}", output.status, stderr.trim());
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn fetch_subtitles(&self, video_id: &str, workdir: &Path) -> Result<()> {
        self.run(&self.subtitle_args(video_id, workdir)).await?;
        Ok(())
    }

    async fn list_entries(&self, url: &str, max_entries: Option<u32>) -> Result<RawListing> {
        let stdout = self.run(&Self::listing_args(url, max_entries)).await?;
        parse_listing(&stdout)
    }
}

fn parse_listing(json: &[u8]) -> Result<RawListing> {
    let listing: RawListing = serde_json::from_slice(json)?;
    debug!("Listing returned {} entries", listing.entries.len());
    Ok(listing)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// First line of `<binary> --version`, if the tool runs
pub fn tool_version(binary: &Path) -> Option<String> {
    Command::new(binary)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

use std::path::{Path, PathBuf};

use log::{debug, error, info};
use thiserror::Error;

use crate::youtube::{Extractor, RawEntry, RawListing};
use crate::{Listing, RequestOptions, Transcript, VideoSummary, output, validate};

/// Caption file suffixes in order of preference
const SUBTITLE_PREFERENCE: [&str; 4] = [".en.srt", ".srt", ".en.vtt", ".vtt"];

const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No subtitle file found")]
    NoSubtitleFile,

    #[error("Subtitle file is empty")]
    EmptySubtitleFile,

    /// Scraper or I/O failure; the report is logged, never shown to callers
    #[error("extraction backend failed")]
    Backend(eyre::Report),
}

impl From<eyre::Report> for ExtractError {
    fn from(report: eyre::Report) -> Self {
        ExtractError::Backend(report)
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Backend(e.into())
    }
}

/// Fetch subtitles for a video and render them.
///
/// Subtitle files live in a temporary directory that is removed when this returns,
/// whichever way it returns.
pub async fn extract_transcript(
    extractor: &dyn Extractor,
    video_id: &str,
    options: RequestOptions,
) -> Result<Transcript, ExtractError> {
    let workdir = tempfile::Builder::new().prefix("ytscribe-").tempdir()?;
    debug!("Fetching subtitles for {video_id} into {}", workdir.path().display());

    extractor.fetch_subtitles(video_id, workdir.path()).await?;

    let Some(path) = find_subtitle_file(workdir.path())? else {
        info!("No subtitle file produced for {video_id}");
        return Err(ExtractError::NoSubtitleFile);
    };
    debug!("Found subtitle file: {}", path.display());

    let content = tokio::fs::read_to_string(&path).await?;
    if content.trim().is_empty() {
        return Err(ExtractError::EmptySubtitleFile);
    }

    let transcript = output::transcribe(&content, options.format, options.include_timestamps)?;
    info!(
        "Extracted transcript for {video_id}: format={}, words={}",
        options.format, transcript.word_count
    );
    Ok(transcript)
}

/// Pick the caption file by suffix preference.
///
/// Ties within a suffix go to the first name in sorted order.
fn find_subtitle_file(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    Ok(SUBTITLE_PREFERENCE
        .iter()
        .find_map(|suffix| names.iter().find(|name| name.ends_with(suffix)))
        .map(|name| dir.join(name)))
}

pub async fn list_playlist(extractor: &dyn Extractor, url: &str) -> Result<Listing, ExtractError> {
    let raw = extractor.list_entries(url, None).await?;
    let name = raw.title.clone().unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string());
    let listing = to_listing(name, raw);
    info!("Playlist {url}: {} videos", listing.videos.len());
    Ok(listing)
}

/// List a channel's uploads, capped at `max_videos` after clamping
pub async fn list_channel(
    extractor: &dyn Extractor,
    url: &str,
    max_videos: Option<f64>,
) -> Result<Listing, ExtractError> {
    let url = validate::canonical_channel_url(url);
    let max = validate::clamp_max_videos(max_videos);

    let raw = extractor.list_entries(&url, Some(max)).await?;
    let name = raw
        .channel
        .clone()
        .or_else(|| raw.uploader.clone())
        .or_else(|| raw.title.clone())
        .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());
    let listing = to_listing(name, raw);
    info!("Channel {url}: {} videos (max {max})", listing.videos.len());
    Ok(listing)
}

fn to_listing(name: String, raw: RawListing) -> Listing {
    let fallback_channel = raw.channel.or(raw.uploader);
    let videos = raw
        .entries
        .into_iter()
        .filter_map(|entry| to_summary(entry, fallback_channel.as_deref()))
        .collect();
    Listing { name, videos }
}

fn to_summary(entry: RawEntry, fallback_channel: Option<&str>) -> Option<VideoSummary> {
    let id = entry
        .id
        .as_deref()
        .and_then(validate::normalize_video_id)
        .or_else(|| entry.url.as_deref().and_then(validate::normalize_video_id));
    let Some(id) = id else {
        debug!("Skipping listing entry without a video id: {:?}", entry.id);
        return None;
    };

    let thumbnail = entry
        .thumbnails
        .last()
        .map(|t| t.url.clone())
        .or(entry.thumbnail)
        .unwrap_or_else(|| default_thumbnail(&id));

    Some(VideoSummary {
        title: entry.title.unwrap_or_else(|| "Untitled".to_string()),
        thumbnail,
        channel_name: entry
            .channel
            .or(entry.uploader)
            .or_else(|| fallback_channel.map(str::to_string)),
        id,
    })
}

pub fn default_thumbnail(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}

/// Log the underlying failure and return the caller-facing message
pub fn describe_failure(err: &ExtractError, generic: &str) -> String {
    match err {
        ExtractError::Backend(report) => {
            error!("{generic}: {report:?}");
            generic.to_string()
        }
        other => other.to_string(),
    }
}

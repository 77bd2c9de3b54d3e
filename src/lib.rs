pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod ratelimit;
pub mod server;
pub mod subtitle;
pub mod validate;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

/// A single timed caption entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time exactly as written in the caption file
    pub timestamp: String,
    pub text: String,
}

/// Requested transcript rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Srt,
    Vtt,
    /// Also chosen for unrecognised format names
    #[default]
    #[serde(other)]
    Txt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Txt => write!(f, "txt"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    pub format: OutputFormat,
    /// Only honoured for `txt`
    pub include_timestamps: bool,
}

/// Rendered transcript for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub transcript: String,
    pub word_count: usize,
}

/// One video in a playlist or channel listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

/// Videos of a playlist or channel, in listing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub videos: Vec<VideoSummary>,
}

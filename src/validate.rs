use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Upper bound for `maxVideos` on channel listings, also the default
pub const MAX_CHANNEL_VIDEOS: u32 = 50;

const VIDEO_ID_LEN: usize = 11;

static BARE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([a-zA-Z0-9_-]+)").unwrap());

/// Check that a URL points at YouTube over http(s).
///
/// Unparsable URLs are simply not allowed.
pub fn is_allowed_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    host == "youtu.be" || host.ends_with("youtube.com")
}

/// Reduce a bare video ID or a YouTube URL to an 11-character video ID.
///
/// Channel IDs (`UC...`) and anything that is not exactly 11 ID characters are rejected.
pub fn normalize_video_id(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let candidate = if raw.contains("youtube.com") || raw.contains("youtu.be") {
        let tokens: Vec<&str> = URL_TOKEN
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();
        if tokens.iter().any(|t| is_channel_id(t)) {
            return None;
        }
        tokens.into_iter().find(|t| t.len() == VIDEO_ID_LEN)?
    } else {
        raw
    };

    if is_channel_id(candidate) {
        return None;
    }
    if candidate.len() != VIDEO_ID_LEN || !BARE_VIDEO_ID.is_match(candidate) {
        return None;
    }
    Some(candidate.to_string())
}

fn is_channel_id(s: &str) -> bool {
    s.starts_with("UC") && s.len() > 15
}

/// Point a channel URL at its videos tab
pub fn canonical_channel_url(url: &str) -> String {
    let base = url.trim().trim_end_matches('/');
    if base.ends_with("/videos") {
        base.to_string()
    } else {
        format!("{base}/videos")
    }
}

/// Clamp a caller-supplied `maxVideos` into `1..=MAX_CHANNEL_VIDEOS`.
///
/// Fractions are truncated after clamping; values that are not finite fall back to the default.
pub fn clamp_max_videos(requested: Option<f64>) -> u32 {
    match requested {
        Some(n) if n.is_finite() => n.clamp(1.0, f64::from(MAX_CHANNEL_VIDEOS)) as u32,
        _ => MAX_CHANNEL_VIDEOS,
    }
}

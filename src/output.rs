use eyre::Result;

use crate::{Cue, OutputFormat, Transcript};

/// Render parsed cues in the requested format.
///
/// `srt` and `vtt` return `raw` untouched.
pub fn render(
    raw: &str,
    cues: &[Cue],
    format: OutputFormat,
    include_timestamps: bool,
) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => render_json(cues)?,
        OutputFormat::Srt | OutputFormat::Vtt => raw.to_string(),
        OutputFormat::Txt if include_timestamps => render_timestamped(cues),
        OutputFormat::Txt => render_text(cues),
    };
    Ok(rendered)
}

/// Render cue texts as a single space-joined string
pub fn render_text(cues: &[Cue]) -> String {
    cues.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Render one `[timestamp] text` line per cue
pub fn render_timestamped(cues: &[Cue]) -> String {
    cues.iter()
        .map(|c| format!("[{}] {}", c.timestamp, c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(cues: &[Cue]) -> Result<String> {
    Ok(serde_json::to_string_pretty(cues)?)
}

/// Count words in the plain text rendering, whatever format was requested
pub fn word_count(cues: &[Cue]) -> usize {
    render_text(cues).split_whitespace().count()
}

/// Parse caption text and build the rendered transcript with its word count
pub fn transcribe(raw: &str, format: OutputFormat, include_timestamps: bool) -> Result<Transcript> {
    let cues = crate::subtitle::parse(raw);
    Ok(Transcript {
        transcript: render(raw, &cues, format, include_timestamps)?,
        word_count: word_count(&cues),
    })
}

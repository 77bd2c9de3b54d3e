use crate::Cue;

const CUE_SEPARATOR: &str = "-->";
const WEBVTT_HEADER: &str = "WEBVTT";

/// Line scanner state
#[derive(Debug)]
enum State {
    /// Between cues, waiting for a timing line
    Seeking,
    /// After a timing line, collecting caption text until a blank line
    InCue { start: String, lines: Vec<String> },
}

/// Parse SRT or WebVTT caption text into cues, in file order.
///
/// Anything that is not a timing line is ignored while seeking, so SRT sequence
/// numbers and VTT metadata headers need no special handling. Cues whose text ends
/// up empty are dropped.
pub fn parse(content: &str) -> Vec<Cue> {
    let mut lines = content.trim().lines().peekable();
    if lines.peek().is_some_and(|first| first.starts_with(WEBVTT_HEADER)) {
        lines.next();
    }

    let mut cues = Vec::new();
    let mut state = State::Seeking;

    for raw in lines {
        let line = raw.trim();
        state = match state {
            State::Seeking if line.is_empty() => State::Seeking,
            State::Seeking => match line.split_once(CUE_SEPARATOR) {
                Some((start, _)) => State::InCue {
                    start: start.trim().to_string(),
                    lines: Vec::new(),
                },
                None => State::Seeking,
            },
            State::InCue { start, lines } if line.is_empty() => {
                close_cue(&mut cues, start, lines);
                State::Seeking
            }
            State::InCue { start, mut lines } => {
                if !line.contains(CUE_SEPARATOR) && !line.starts_with(WEBVTT_HEADER) {
                    lines.push(line.to_string());
                }
                State::InCue { start, lines }
            }
        };
    }

    if let State::InCue { start, lines } = state {
        close_cue(&mut cues, start, lines);
    }

    cues
}

fn close_cue(cues: &mut Vec<Cue>, timestamp: String, lines: Vec<String>) {
    let text = lines.join(" ");
    if !text.is_empty() {
        cues.push(Cue { timestamp, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_basic() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\nHello world\n\n\
                   2\n00:00:02,000 --> 00:00:03,000\nSecond line\n";
        let cues = parse(srt);
        assert_eq!(
            cues,
            vec![
                Cue {
                    timestamp: "00:00:01,000".to_string(),
                    text: "Hello world".to_string()
                },
                Cue {
                    timestamp: "00:00:02,000".to_string(),
                    text: "Second line".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_srt_block_count_matches() {
        let srt: String = (0..25)
            .map(|i| format!("{}\n00:00:{i:02},000 --> 00:00:{i:02},900\nline {i}\n\n", i + 1))
            .collect();
        let cues = parse(&srt);
        assert_eq!(cues.len(), 25);
        for (i, cue) in cues.iter().enumerate() {
            assert_eq!(cue.timestamp, format!("00:00:{i:02},000"));
            assert_eq!(cue.text, format!("line {i}"));
        }
    }

    #[test]
    fn test_parse_multiline_cue_joined_with_space() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000\n  first part  \nsecond part\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "first part second part");
    }

    #[test]
    fn test_parse_vtt_header_and_metadata() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\n\
                   00:00:00.500 --> 00:00:01.500 align:start position:0%\nHi there\n\n\
                   00:00:01.500 --> 00:00:03.000\nBye\n";
        let cues = parse(vtt);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].timestamp, "00:00:00.500");
        assert_eq!(cues[0].text, "Hi there");
        assert_eq!(cues[1].timestamp, "00:00:01.500");
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n\
                   2\r\n00:00:02,000 --> 00:00:03,000\r\nWorld\r\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn test_parse_drops_empty_cue() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:02,000 --> 00:00:03,000\nkept\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "kept");
    }

    #[test]
    fn test_parse_excludes_separator_and_header_lines_inside_cue() {
        let srt = "00:00:01,000 --> 00:00:02,000\nkeep me\n\
                   00:00:02,000 --> 00:00:03,000\nWEBVTT stray\nand me\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].timestamp, "00:00:01,000");
        assert_eq!(cues[0].text, "keep me and me");
    }

    #[test]
    fn test_parse_ignores_text_outside_cues() {
        let srt = "garbage before\n\n00:00:01,000 --> 00:00:02,000\nreal\n\n\
                   42\nnot a timing line\n";
        let cues = parse(srt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "real");
    }

    #[test]
    fn test_parse_no_cues() {
        assert!(parse("").is_empty());
        assert!(parse("WEBVTT\n\n").is_empty());
        assert!(parse("just some words\nwith no timings").is_empty());
    }
}

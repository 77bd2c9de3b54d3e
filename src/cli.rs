use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ytscribe::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Txt,
    Json,
    Srt,
    Vtt,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Srt => OutputFormat::Srt,
            FormatArg::Vtt => OutputFormat::Vtt,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "ytscribe",
    about = "YouTube transcript and listing API backed by yt-dlp",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to the yt-dlp executable (overrides config)
    #[arg(long, global = true)]
    pub yt_dlp: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Browser origin allowed by CORS
        #[arg(long)]
        allowed_origin: Option<String>,
    },

    /// Print the transcript of one video
    Extract {
        /// YouTube video URL or video ID
        video: String,

        /// Output format: txt (default), json, srt, vtt
        #[arg(short, long, value_enum, default_value_t = FormatArg::Txt)]
        format: FormatArg,

        /// Prefix each line with its start time (txt only)
        #[arg(short, long)]
        timestamps: bool,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the videos of a playlist as JSON
    Playlist {
        url: String,
    },

    /// List the latest videos of a channel as JSON
    Channel {
        url: String,

        /// Maximum number of videos (clamped to 1..=50)
        #[arg(short = 'n', long)]
        max_videos: Option<i64>,
    },
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, Commands};
use ytscribe::config::{self, Config};
use ytscribe::extract;
use ytscribe::youtube::{self, YtDlp};
use ytscribe::{RequestOptions, VideoSummary, validate};

/// The server logs to stderr; one-shot commands log to a file so stdout stays clean.
fn setup_logging(to_file: bool) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if to_file {
        let log_dir = log_dir();
        std::fs::create_dir_all(&log_dir)?;
        let log_file = log_dir.join("ytscribe.log");
        let target = Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)?,
        );
        builder.target(env_logger::Target::Pipe(target));
        builder.init();
        info!("Logging initialized: {}", log_file.display());
    } else {
        builder.init();
    }
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytscribe")
        .join("logs")
}

fn build_after_help(yt_dlp: &Path) -> String {
    let yt_dlp_line = match youtube::tool_version(yt_dlp) {
        Some(v) => format!("  \x1b[32m✅\x1b[0m yt-dlp     {v}"),
        None => {
            "  \x1b[31m❌\x1b[0m yt-dlp     (not found, required for all extraction)".to_string()
        }
    };

    let log_path = log_dir().join("ytscribe.log");

    format!(
        "\nREQUIRED TOOLS:\n{yt_dlp_line}\n\nConfig: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_path.display()
    )
}

fn print_listing(name_key: &str, name: &str, videos: &[VideoSummary]) -> Result<()> {
    let mut json = serde_json::Map::new();
    json.insert(name_key.to_string(), name.into());
    json.insert("videos".to_string(), serde_json::to_value(videos)?);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    let after_help = build_after_help(&config.yt_dlp());
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    setup_logging(!matches!(cli.command, Commands::Serve { .. }))?;

    // CLI flags take priority over config
    let yt_dlp_path = cli.yt_dlp.clone().unwrap_or_else(|| config.yt_dlp());
    let ytdlp = YtDlp::new(&yt_dlp_path, config.subtitle_langs());
    debug!("Using yt-dlp at {}", yt_dlp_path.display());

    match cli.command {
        Commands::Serve {
            host,
            port,
            allowed_origin,
        } => {
            match youtube::tool_version(&yt_dlp_path) {
                Some(v) => info!("yt-dlp version: {v}"),
                None => warn!(
                    "yt-dlp not found at {}; extraction requests will fail",
                    yt_dlp_path.display()
                ),
            }
            let host = host.unwrap_or_else(|| config.host());
            let port = port.unwrap_or_else(|| config.port());
            let allowed_origin = allowed_origin.unwrap_or_else(|| config.allowed_origin());
            let limiter = config.rate_limit.limiter();

            ytscribe::server::run_server(host, port, allowed_origin, Arc::new(ytdlp), limiter)
                .await?;
        }
        Commands::Extract {
            video,
            format,
            timestamps,
            output,
        } => {
            let Some(video_id) = validate::normalize_video_id(&video) else {
                bail!(
                    "could not extract video ID from: {video}\n\n\
                     Supported formats:\n  \
                     https://www.youtube.com/watch?v=ID\n  \
                     https://youtu.be/ID\n  \
                     https://www.youtube.com/shorts/ID\n  \
                     <11-character video ID>"
                );
            };
            let options = RequestOptions {
                format: format.into(),
                include_timestamps: timestamps,
            };

            let transcript = extract::extract_transcript(&ytdlp, &video_id, options)
                .await
                .map_err(|e| {
                    eyre::eyre!(extract::describe_failure(&e, "Error extracting transcript"))
                })?;
            info!("Extracted {} words for {video_id}", transcript.word_count);

            if let Some(ref path) = output {
                std::fs::write(path, &transcript.transcript)?;
                eprintln!("Output written to: {}", path.display());
            } else {
                println!("{}", transcript.transcript);
            }
        }
        Commands::Playlist { url } => {
            if !validate::is_allowed_url(&url) {
                bail!("not a YouTube URL: {url}");
            }
            let listing = extract::list_playlist(&ytdlp, &url)
                .await
                .map_err(|e| {
                    eyre::eyre!(extract::describe_failure(&e, "Failed to extract playlist videos"))
                })?;
            print_listing("playlistName", &listing.name, &listing.videos)?;
        }
        Commands::Channel { url, max_videos } => {
            if !validate::is_allowed_url(&url) {
                bail!("not a YouTube URL: {url}");
            }
            let listing = extract::list_channel(&ytdlp, &url, max_videos.map(|n| n as f64))
                .await
                .map_err(|e| {
                    eyre::eyre!(extract::describe_failure(&e, "Failed to extract channel videos"))
                })?;
            print_listing("channelName", &listing.name, &listing.videos)?;
        }
    }

    Ok(())
}

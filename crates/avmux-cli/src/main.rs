//! avmux binary: merge an audio track with a still image or a video.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use avmux_media::{FsMediaStore, MediaResult, MuxSession, Resolver};
use avmux_models::{EncodeJob, EncodingConfig, JobKind, MediaKind, MediaReference};

use config::MuxConfig;

#[derive(Parser)]
#[command(name = "avmux", version, about = "Merge an audio track with a still image or video into an MP4")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Loop a still image over an audio track
    Image {
        /// Reference to the still image
        #[arg(long)]
        image: String,
        /// Reference to the audio track
        #[arg(long)]
        audio: String,
        /// Output directory (default: AVMUX_OUTPUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Replace a video's audio track, stream-copying the video
    Video {
        /// Reference to the video
        #[arg(long)]
        video: String,
        /// Reference to the audio track
        #[arg(long)]
        audio: String,
        /// Output directory (default: AVMUX_OUTPUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON when requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("avmux=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    let config = MuxConfig::from_env();

    match run(cli.command, &config).await {
        Ok(output) => {
            info!("Merged file written to {}", output.display());
            println!("{}", output.display());
        }
        Err(e) => {
            error!("Merge failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(command: Command, config: &MuxConfig) -> MediaResult<PathBuf> {
    let (kind, visual_kind, visual, audio, out_dir) = match command {
        Command::Image { image, audio, out_dir } => {
            (JobKind::ImageAudio, MediaKind::Image, image, audio, out_dir)
        }
        Command::Video { video, audio, out_dir } => {
            (JobKind::VideoAudio, MediaKind::Video, video, audio, out_dir)
        }
    };
    let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());

    let resolver = Resolver::new(FsMediaStore::new(), &config.cache_dir);

    let visual = resolver
        .resolve(&MediaReference::new(visual), visual_kind)
        .await?;
    // The audio handle owns a temp copy; it is deleted when this fn returns.
    let audio = resolver
        .resolve(&MediaReference::new(audio), MediaKind::Audio)
        .await?;

    let job = EncodeJob::new(kind, visual.path(), audio.path(), out_dir);
    let session = MuxSession::new(EncodingConfig::default());
    let result = session.encode(&job).await?;

    Ok(result.output)
}

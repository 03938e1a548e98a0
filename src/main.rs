use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use voxscribe::{
    batch, config, format, ChunkFailurePolicy, Config, LiveSession, MicCapture, RetryPolicy,
    SessionConfig, WhisperApiClient,
};

#[derive(Parser)]
#[command(
    name = "voxscribe",
    about = "Speech transcription via a Whisper-compatible API, with transcript formatting",
    version
)]
struct Cli {
    /// Config file path (TOML); defaults to config/voxscribe when present
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture microphone audio in fixed chunks and transcribe continuously
    Mic {
        /// Chunk duration in seconds
        #[arg(long)]
        chunk_seconds: Option<u64>,

        /// Language hint (e.g. "zh"); omit for auto-detection
        #[arg(long)]
        language: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// What to do when a chunk fails to transcribe
        #[arg(long, value_enum, default_value_t = OnError::Abort)]
        on_error: OnError,
    },
    /// Transcribe a single audio file in one call
    File {
        /// Audio file to transcribe (any format the service accepts)
        path: PathBuf,

        /// Language hint (e.g. "zh"); omit for auto-detection
        #[arg(long)]
        language: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,
    },
    /// Segment a transcript into sentences and drop adjacent duplicates
    Format {
        /// Directory of transcript files; defaults to the output directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Zero-based index into the lexicographically sorted .txt files
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnError {
    /// End the session on the first failed chunk
    Abort,
    /// Log the failure and keep capturing
    Skip,
}

impl From<OnError> for ChunkFailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => ChunkFailurePolicy::Abort,
            OnError::Skip => ChunkFailurePolicy::Skip,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    let session_ts = config::session_timestamp();

    match cli.command {
        Command::Mic {
            chunk_seconds,
            language,
            model,
            on_error,
        } => {
            if let Some(secs) = chunk_seconds {
                cfg.audio.chunk_seconds = secs;
            }
            if let Some(lang) = language {
                cfg.transcription.language = Some(lang);
            }
            if let Some(model) = model {
                cfg.transcription.model = model;
            }

            run_mic(&cfg, session_ts, on_error.into()).await?;
        }
        Command::File {
            path,
            language,
            model,
        } => {
            if let Some(lang) = language {
                cfg.transcription.language = Some(lang);
            }
            if let Some(model) = model {
                cfg.transcription.model = model;
            }

            let api_key = config::load_api_key()?;
            let transcriber = WhisperApiClient::new(
                &cfg.transcription.base_url,
                api_key,
                &cfg.transcription.model,
            )?;

            batch::run_batch(
                &transcriber,
                RetryPolicy::default(),
                &path,
                cfg.transcription.language.as_deref(),
                PathBuf::from(&cfg.output.dir).as_path(),
                &session_ts,
            )
            .await?;
        }
        Command::Format { dir, index } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&cfg.output.dir));
            format::run_format(&dir, index)?;
        }
    }

    Ok(())
}

async fn run_mic(cfg: &Config, session_ts: String, failure_policy: ChunkFailurePolicy) -> Result<()> {
    let api_key = config::load_api_key()?;
    let transcriber = WhisperApiClient::new(
        &cfg.transcription.base_url,
        api_key,
        &cfg.transcription.model,
    )?;
    let capture = MicCapture::new(cfg.audio.sample_rate);

    let session_config = SessionConfig {
        session_id: session_ts,
        chunk_duration: Duration::from_secs(cfg.audio.chunk_seconds),
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        language: cfg.transcription.language.clone(),
        output_dir: PathBuf::from(&cfg.output.dir),
        failure_policy,
        retry: RetryPolicy::default(),
    };

    let session = LiveSession::new(session_config)?;

    // Ctrl-C sets the flag; the loop notices between iterations.
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current chunk");
            flag.store(true, Ordering::SeqCst);
        }
    });

    let stats = session.run(&capture, &transcriber, shutdown).await?;
    info!(
        "session complete: {} chunks in {:.1}s",
        stats.chunks, stats.duration_secs
    );

    Ok(())
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate in Hz (Whisper expects 16kHz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono)
    pub channels: u16,
    /// Duration of each live-mode chunk in seconds
    pub chunk_seconds: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            chunk_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Base URL of the Whisper-compatible API
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Language hint; absent means the service auto-detects
    pub language: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            language: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where session logs and transcripts are written
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file plus VOXSCRIBE_* environment
    /// overrides. Every field has a default, so running without a config file
    /// is fine.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::with_name(path));
            }
            None => {
                builder =
                    builder.add_source(config::File::with_name("config/voxscribe").required(false));
            }
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("VOXSCRIBE").separator("__"))
            .build()
            .context("failed to load configuration")?;

        settings.try_deserialize().context("invalid configuration")
    }
}

/// Timestamp that namespaces every output file of one process run.
/// Computed once at startup and passed explicitly to whatever names files.
pub fn session_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// The transcription service credential. Required for `mic` and `file`,
/// not for `format`.
pub fn load_api_key() -> Result<String> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!(
            "OPENAI_API_KEY is not set. Export it (or add it to your shell profile) \
             before running a transcription command."
        ),
    }
}

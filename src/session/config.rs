use crate::transcribe::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// What the live loop does when a chunk fails to transcribe.
///
/// Capture failures are always fatal (audio hardware does not recover
/// without operator intervention); this policy only covers the service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFailurePolicy {
    /// End the session with the error (the log keeps every prior line)
    Abort,
    /// Log the failure and continue; the chunk index does not advance
    Skip,
}

/// Configuration for a live transcription session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session identifier, the process-wide startup timestamp
    /// (e.g. "20260828-101500"); names the session log file
    pub session_id: String,

    /// Duration of each captured chunk
    /// Default: 5 seconds
    pub chunk_duration: Duration,

    /// Sample rate for captured audio (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono)
    pub channels: u16,

    /// Language hint passed to the service; None = auto-detect
    pub language: Option<String>,

    /// Directory the session log is written to
    pub output_dir: PathBuf,

    /// Chunk-level failure handling
    pub failure_policy: ChunkFailurePolicy,

    /// Retry policy for transient service errors
    pub retry: RetryPolicy,
}

impl SessionConfig {
    pub fn new(session_id: String, output_dir: PathBuf) -> Self {
        Self {
            session_id,
            chunk_duration: Duration::from_secs(5),
            sample_rate: 16_000,
            channels: 1,
            language: None,
            output_dir,
            failure_policy: ChunkFailurePolicy::Abort,
            retry: RetryPolicy::default(),
        }
    }
}

pub mod audio;
pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod transcribe;

pub use audio::{encode_wav, AudioCapture, MicCapture};
pub use config::Config;
pub use error::{FormatError, TranscribeError};
pub use format::{format_transcript, formatted_path, select_target};
pub use session::{ChunkFailurePolicy, LiveSession, SessionConfig, SessionStats};
pub use transcribe::{transcribe_with_retry, RetryPolicy, Transcriber, WhisperApiClient};

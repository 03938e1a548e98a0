#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("no .txt files found in {0}")]
    NoInputFiles(String),
    #[error("requested file index {index} but only {count} files exist")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("failed to read input directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("transcription service rejected credentials: {0}")]
    Auth(String),
    #[error("transcription service request failed: {0}")]
    Service(String),
    #[error("invalid response from transcription service: {0}")]
    InvalidResponse(String),
}

impl TranscribeError {
    /// Whether retrying the same request could plausibly succeed.
    /// Auth failures and malformed responses will not improve on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, TranscribeError::Service(_))
    }
}

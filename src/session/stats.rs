use chrono::{DateTime, Utc};

/// Statistics about a live transcription session
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds
    pub duration_secs: f64,

    /// Number of chunks successfully transcribed and logged
    pub chunks: usize,
}

use super::config::{ChunkFailurePolicy, SessionConfig};
use super::stats::SessionStats;
use crate::audio::{encode_wav, AudioCapture};
use crate::transcribe::{transcribe_with_retry, Transcriber};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A live transcription session: capture -> encode -> transcribe -> log,
/// one chunk at a time, until the shutdown flag is set.
///
/// The loop is deliberately single-lane. The only suspension points are the
/// chunk capture and the service round-trip, and one iteration completes
/// before the next begins, so the log index is trivially gap-free.
pub struct LiveSession {
    config: SessionConfig,
}

impl LiveSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        // Capture downmixes to mono, so any other channel count would
        // mislabel the encoded chunks.
        if config.channels != 1 {
            bail!(
                "capture produces mono PCM; channels must be 1, got {}",
                config.channels
            );
        }

        fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                config.output_dir.display()
            )
        })?;

        Ok(Self { config })
    }

    /// Path of the append-only session log, fixed for the whole session.
    pub fn log_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(format!("mic_{}.txt", self.config.session_id))
    }

    /// Run the capture loop until `shutdown` is set.
    ///
    /// The flag is observed between iterations only; an in-flight chunk is
    /// either completed and logged or abandoned whole, never half-written.
    pub async fn run(
        &self,
        capture: &dyn AudioCapture,
        transcriber: &dyn Transcriber,
        shutdown: Arc<AtomicBool>,
    ) -> Result<SessionStats> {
        let started_at = Utc::now();
        let log_path = self.log_path();

        info!(
            "live transcription started from {} (chunks: {:?}, log: {})",
            capture.name(),
            self.config.chunk_duration,
            log_path.display()
        );

        let mut index: usize = 1;

        while !shutdown.load(Ordering::SeqCst) {
            let samples = capture
                .capture(self.config.chunk_duration)
                .await
                .context("audio capture failed")?;

            // Interrupt arrived during capture: abandon the in-flight chunk.
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            let wav = encode_wav(&samples, self.config.sample_rate, self.config.channels)
                .context("failed to encode chunk")?;

            let submitted = Instant::now();
            let result = transcribe_with_retry(
                transcriber,
                self.config.retry,
                wav,
                "audio.wav",
                self.config.language.as_deref(),
            )
            .await;

            match result {
                Ok(text) => {
                    let latency = submitted.elapsed();
                    self.append_line(&log_path, index, &text)?;
                    info!("[{index:03}] {text} ({:.2}s)", latency.as_secs_f64());
                    index += 1;
                }
                Err(err) => match self.config.failure_policy {
                    ChunkFailurePolicy::Abort => {
                        return Err(err).context("transcription failed, ending session");
                    }
                    ChunkFailurePolicy::Skip => {
                        warn!("transcription failed, skipping chunk: {err}");
                    }
                },
            }
        }

        let duration = Utc::now().signed_duration_since(started_at);
        let stats = SessionStats {
            started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            chunks: index - 1,
        };

        info!(
            "live transcription stopped: {} chunks in {:.1}s",
            stats.chunks, stats.duration_secs
        );

        Ok(stats)
    }

    /// Append one `[NNN] text` line. Opens and closes the file per call so a
    /// crash mid-loop loses at most the in-flight chunk, never prior lines.
    fn append_line(&self, path: &Path, index: usize, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open session log {}", path.display()))?;

        writeln!(file, "[{index:03}] {text}")
            .with_context(|| format!("failed to append to session log {}", path.display()))?;

        Ok(())
    }
}

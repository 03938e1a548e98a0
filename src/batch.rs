//! Whole-file transcription (batch mode)
//!
//! The file goes to the service as raw bytes in a single call; the service
//! is trusted to handle its own container formats and sizes.

use crate::transcribe::{transcribe_with_retry, RetryPolicy, Transcriber};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Transcribe one audio file in a single service call.
pub async fn transcribe_file(
    transcriber: &dyn Transcriber,
    retry: RetryPolicy,
    path: &Path,
    language: Option<&str>,
) -> Result<String> {
    let audio = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read audio file {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio");

    let text = transcribe_with_retry(transcriber, retry, audio, filename, language)
        .await
        .context("transcription request failed")?;

    Ok(text)
}

/// Transcribe `path` and write the verbatim result to
/// `<output_dir>/file_<stem>_<session_ts>.txt`.
pub async fn run_batch(
    transcriber: &dyn Transcriber,
    retry: RetryPolicy,
    path: &Path,
    language: Option<&str>,
    output_dir: &Path,
    session_ts: &str,
) -> Result<PathBuf> {
    info!("transcribing file: {}", path.display());

    let text = transcribe_file(transcriber, retry, path, language).await?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("audio");

    let out_path = output_dir.join(format!("file_{stem}_{session_ts}.txt"));

    tokio::fs::write(&out_path, &text)
        .await
        .with_context(|| format!("failed to write transcript {}", out_path.display()))?;

    info!("transcript saved: {}", out_path.display());

    Ok(out_path)
}

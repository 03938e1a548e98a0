// Integration tests for the live capture-transcribe loop
//
// A fake capture source and a scripted transcriber drive the loop without
// hardware or network, verifying log index integrity and failure policies.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use voxscribe::error::TranscribeError;
use voxscribe::transcribe::{RetryPolicy, Transcriber};
use voxscribe::{AudioCapture, ChunkFailurePolicy, LiveSession, SessionConfig};

/// Returns silent PCM instantly and trips the shutdown flag once
/// `max_chunks` captures have been handed out, so the loop ends cleanly
/// with the final in-flight chunk abandoned.
struct FakeCapture {
    max_chunks: usize,
    captured: AtomicUsize,
    shutdown: Arc<AtomicBool>,
}

impl FakeCapture {
    fn new(max_chunks: usize, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            max_chunks,
            captured: AtomicUsize::new(0),
            shutdown,
        }
    }
}

#[async_trait]
impl AudioCapture for FakeCapture {
    async fn capture(&self, _duration: Duration) -> Result<Vec<i16>> {
        let n = self.captured.fetch_add(1, Ordering::SeqCst) + 1;
        if n > self.max_chunks {
            self.shutdown.store(true, Ordering::SeqCst);
        }
        Ok(vec![0i16; 1600])
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Pops one scripted response per call; answers "tail" once the script runs out.
struct ScriptedTranscriber {
    responses: Mutex<VecDeque<Result<String, TranscribeError>>>,
}

impl ScriptedTranscriber {
    fn new(responses: Vec<Result<String, TranscribeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _filename: &str,
        _language: Option<&str>,
    ) -> Result<String, TranscribeError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("tail".to_string()))
    }
}

fn session_config(output_dir: PathBuf, failure_policy: ChunkFailurePolicy) -> SessionConfig {
    let mut config = SessionConfig::new("20260828-120000".to_string(), output_dir);
    config.chunk_duration = Duration::from_millis(10);
    config.failure_policy = failure_policy;
    config.retry = RetryPolicy::none();
    config
}

#[tokio::test]
async fn successful_chunks_are_indexed_without_gaps() -> Result<()> {
    let dir = TempDir::new()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let capture = FakeCapture::new(3, Arc::clone(&shutdown));
    let transcriber = ScriptedTranscriber::new(vec![
        Ok("alpha".to_string()),
        Ok("beta".to_string()),
        Ok("gamma".to_string()),
    ]);

    let session = LiveSession::new(session_config(
        dir.path().to_path_buf(),
        ChunkFailurePolicy::Abort,
    ))?;
    let stats = session.run(&capture, &transcriber, shutdown).await?;

    assert_eq!(stats.chunks, 3);

    let log = fs::read_to_string(session.log_path())?;
    assert_eq!(log, "[001] alpha\n[002] beta\n[003] gamma\n");
    Ok(())
}

#[tokio::test]
async fn abort_policy_keeps_prior_lines_on_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let capture = FakeCapture::new(10, Arc::clone(&shutdown));
    let transcriber = ScriptedTranscriber::new(vec![
        Ok("one".to_string()),
        Ok("two".to_string()),
        Err(TranscribeError::Service("503 from upstream".to_string())),
    ]);

    let session = LiveSession::new(session_config(
        dir.path().to_path_buf(),
        ChunkFailurePolicy::Abort,
    ))?;
    let result = session.run(&capture, &transcriber, shutdown).await;

    assert!(result.is_err(), "abort policy must surface the failure");

    // Failure on chunk 3 leaves exactly the 2 successful lines.
    let log = fs::read_to_string(session.log_path())?;
    assert_eq!(log, "[001] one\n[002] two\n");
    Ok(())
}

#[tokio::test]
async fn skip_policy_does_not_advance_the_index() -> Result<()> {
    let dir = TempDir::new()?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let capture = FakeCapture::new(3, Arc::clone(&shutdown));
    let transcriber = ScriptedTranscriber::new(vec![
        Ok("kept".to_string()),
        Err(TranscribeError::Service("timeout".to_string())),
        Ok("also kept".to_string()),
    ]);

    let session = LiveSession::new(session_config(
        dir.path().to_path_buf(),
        ChunkFailurePolicy::Skip,
    ))?;
    let stats = session.run(&capture, &transcriber, shutdown).await?;

    assert_eq!(stats.chunks, 2, "failed chunk must not count");

    let log = fs::read_to_string(session.log_path())?;
    assert_eq!(log, "[001] kept\n[002] also kept\n");
    Ok(())
}

#[test]
fn non_mono_channel_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = session_config(dir.path().to_path_buf(), ChunkFailurePolicy::Abort);
    config.channels = 2;

    let result = LiveSession::new(config);

    assert!(
        result.is_err(),
        "mono capture must not be labeled as multi-channel audio"
    );
}

#[tokio::test]
async fn preset_shutdown_produces_no_log_lines() -> Result<()> {
    let dir = TempDir::new()?;
    let shutdown = Arc::new(AtomicBool::new(true));
    let capture = FakeCapture::new(10, Arc::clone(&shutdown));
    let transcriber = ScriptedTranscriber::new(vec![]);

    let session = LiveSession::new(session_config(
        dir.path().to_path_buf(),
        ChunkFailurePolicy::Abort,
    ))?;
    let stats = session.run(&capture, &transcriber, shutdown).await?;

    assert_eq!(stats.chunks, 0);
    assert!(
        !session.log_path().exists(),
        "no chunk succeeded, so no log file should exist"
    );
    Ok(())
}

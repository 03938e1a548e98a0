use crate::error::TranscribeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Remote transcription capability
///
/// The audio buffer is any container the service accepts (WAV for captured
/// chunks, the original bytes for batch files); no local decoding happens.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        language: Option<&str>,
    ) -> Result<String, TranscribeError>;
}

/// Client for an OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl WhisperApiClient {
    pub fn new(base_url: &str, api_key: String, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }
}

fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Transcriber for WhisperApiClient {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        language: Option<&str>,
    ) -> Result<String, TranscribeError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        debug!(
            "transcription request: {} ({} bytes, model={})",
            url,
            audio.len(),
            self.model
        );

        let audio_part = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_for(filename))
            .map_err(|e| TranscribeError::Service(format!("failed to build audio part: {e}")))?;

        let mut form = Form::new()
            .part("file", audio_part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        if let Some(lang) = language.filter(|l| !l.is_empty()) {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::Service(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranscribeError::InvalidResponse(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TranscribeError::Auth(format!("HTTP {status}: {body}")));
        }
        if !status.is_success() {
            return Err(TranscribeError::Service(format!("HTTP {status}: {body}")));
        }

        Ok(body.trim_end().to_string())
    }
}

pub mod client;
pub mod retry;

pub use client::{Transcriber, WhisperApiClient};
pub use retry::{transcribe_with_retry, RetryPolicy};

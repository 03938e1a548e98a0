//! Live transcription sessions
//!
//! This module provides the `LiveSession` abstraction that manages:
//! - Fixed-duration microphone chunk capture
//! - WAV encoding and submission to the transcription service
//! - The append-only session log (`[NNN] text` per chunk)
//! - Clean shutdown between iterations and session statistics

mod config;
mod session;
mod stats;

pub use config::{ChunkFailurePolicy, SessionConfig};
pub use session::LiveSession;
pub use stats::SessionStats;

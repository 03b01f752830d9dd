//! parlo - Pronunciation practice from the terminal
//!
//! Records a practice take, sends it to an inference backend, and shows
//! the transcript alongside the corrected audio.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod backend;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod session;

// Composition root - needs everything
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub mod app;

// Core traits (source → session → backend)
pub use audio::recorder::AudioSource;
pub use backend::client::BackendClient;
pub use backend::response::{CorrectedAudio, InferenceResponse};
pub use session::{Artifact, PracticeSession, SessionState};

// Error handling
pub use error::{ParloError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.2+abc1234"` when git hash is available, `"0.1.2"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

//! Command-line interface for parlo
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Pronunciation practice from the terminal
#[derive(Parser, Debug)]
#[command(name = "parlo", version, about = "Pronunciation practice from the terminal")]
pub struct Cli {
    /// Subcommand to execute (default: record and upload a practice take)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Audio input device (e.g., hw:0)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Inference backend base URL (default: http://localhost:8000)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// User name sent along with the recording
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Stop recording after this long. Examples: 30, 30s, 2m
    #[arg(long, short = 'd', value_name = "DURATION", value_parser = parse_duration_secs)]
    pub duration: Option<u64>,

    /// Save the recorded WAV to this path before uploading
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Where to put the corrected audio (default: corrected.wav)
    #[arg(long, value_name = "PATH")]
    pub corrected: Option<PathBuf>,

    /// Skip fetching the corrected audio
    #[arg(long)]
    pub no_corrected: bool,
}

/// Parse a duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`, `2m30s`).
fn parse_duration_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record audio and save it locally without uploading
    Record {
        /// Where to put the recording (default: recording.wav)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Upload an existing WAV file for inference
    Upload {
        /// WAV file to upload
        file: PathBuf,
    },

    /// List available audio input devices
    Devices,

    /// Check backend reachability and audio devices
    Check,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value by key (e.g., backend.base_url)
    Get {
        /// Dotted key path (e.g., backend.base_url, audio.device)
        key: String,
    },
    /// Set a configuration value by key
    Set {
        /// Dotted key path (e.g., backend.base_url, audio.device)
        key: String,
        /// Value to set
        value: String,
    },
    /// List the effective configuration as TOML
    List,
}

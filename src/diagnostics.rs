//! System diagnostics for the practice setup.
//!
//! Verifies that an audio input device is present and the inference
//! backend is reachable before the user wastes a recording on a dead
//! setup.

use crate::audio::capture;
use crate::backend::client::BackendClient;
use crate::config::Config;
use crate::error::ParloError;

/// Result of a single diagnostic check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Component is present and working
    Ok,
    /// Component is missing
    NotFound,
    /// Component is present but has issues
    Warning(String),
}

/// Check that at least one audio input device is available.
fn check_audio_devices() -> CheckResult {
    match capture::list_devices() {
        Ok(devices) if devices.is_empty() => CheckResult::NotFound,
        Ok(_) => CheckResult::Ok,
        Err(e) => CheckResult::Warning(format!("Error enumerating audio devices: {}", e)),
    }
}

/// Check that the configured device name, if any, actually exists.
fn check_configured_device(device: &str) -> CheckResult {
    match capture::list_devices() {
        Ok(devices) => {
            if devices.iter().any(|d| d == device) {
                CheckResult::Ok
            } else {
                CheckResult::Warning(format!(
                    "configured device '{}' not found, the default device will be used",
                    device
                ))
            }
        }
        Err(e) => CheckResult::Warning(format!("Error enumerating audio devices: {}", e)),
    }
}

/// Probe the inference backend.
async fn check_backend(config: &Config) -> CheckResult {
    let client = match BackendClient::new(&config.backend.base_url, config.backend.timeout_secs) {
        Ok(client) => client,
        Err(e) => return CheckResult::Warning(format!("Bad backend configuration: {}", e)),
    };

    match client.probe().await {
        Ok(()) => CheckResult::Ok,
        Err(ParloError::Unreachable { .. }) => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(e.to_string()),
    }
}

/// Run all diagnostic checks and print results.
pub async fn check_dependencies(config: &Config) {
    println!("Checking practice setup...\n");

    print!("audio input device: ");
    let audio_ok = match check_audio_devices() {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            println!("  No capture devices detected. Is a microphone connected?");
            false
        }
        CheckResult::Warning(msg) => {
            println!("⚠ WARNING: {}", msg);
            false
        }
    };

    if let Some(device) = config.audio.device.as_deref() {
        print!("configured device '{}': ", device);
        match check_configured_device(device) {
            CheckResult::Ok => println!("✓ OK"),
            CheckResult::NotFound => println!("✗ NOT FOUND"),
            CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
        }
    }

    print!("backend {}: ", config.backend.base_url);
    let backend_ok = match check_backend(config).await {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ UNREACHABLE");
            println!("  Is the inference server running?");
            println!("  Override with --server or PARLO_BACKEND_URL.");
            false
        }
        CheckResult::Warning(msg) => {
            println!("⚠ WARNING: {}", msg);
            false
        }
    };

    println!();
    if audio_ok && backend_ok {
        println!("✓ Ready to practice.");
    } else {
        println!("⚠ Fix the items above before recording.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_equality() {
        assert_eq!(CheckResult::Ok, CheckResult::Ok);
        assert_eq!(CheckResult::NotFound, CheckResult::NotFound);
        assert_eq!(
            CheckResult::Warning("test".to_string()),
            CheckResult::Warning("test".to_string())
        );
    }

    #[test]
    fn test_check_result_inequality() {
        assert_ne!(CheckResult::Ok, CheckResult::NotFound);
        assert_ne!(
            CheckResult::Warning("a".to_string()),
            CheckResult::Warning("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_backend_unreachable() {
        // Nothing listens on this port; connection is refused immediately.
        let mut config = Config::default();
        config.backend.base_url = "http://127.0.0.1:1".to_string();
        config.backend.timeout_secs = 5;

        assert_eq!(check_backend(&config).await, CheckResult::NotFound);
    }

    #[tokio::test]
    async fn test_check_dependencies_runs_without_panic() {
        let mut config = Config::default();
        config.backend.base_url = "http://127.0.0.1:1".to_string();
        config.backend.timeout_secs = 5;

        // Just verify it doesn't panic
        check_dependencies(&config).await;
    }
}

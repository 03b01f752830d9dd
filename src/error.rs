//! Error types for parlo.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParloError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Encoding errors
    #[error("WAV encoding failed: {message}")]
    Encode { message: String },

    // Transport errors, produced by the backend client itself so callers can
    // match on the kind instead of inspecting message text
    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },

    #[error("Request rejected by server policy: {message}")]
    RejectedByPolicy { message: String },

    #[error("Backend returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Backend did not respond within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Malformed backend response: {message}")]
    MalformedResponse { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ParloError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = ParloError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_parse_display() {
        let error = ParloError::ConfigParse {
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: invalid TOML syntax"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = ParloError::ConfigInvalidValue {
            key: "backend.timeout_secs".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for backend.timeout_secs: must be positive"
        );
    }

    #[test]
    fn test_audio_device_not_found_display() {
        let error = ParloError::AudioDeviceNotFound {
            device: "default".to_string(),
        };
        assert_eq!(error.to_string(), "Audio device not found: default");
    }

    #[test]
    fn test_audio_capture_display() {
        let error = ParloError::AudioCapture {
            message: "buffer overflow".to_string(),
        };
        assert_eq!(error.to_string(), "Audio capture failed: buffer overflow");
    }

    #[test]
    fn test_encode_display() {
        let error = ParloError::Encode {
            message: "zero-length sample buffer".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "WAV encoding failed: zero-length sample buffer"
        );
    }

    #[test]
    fn test_unreachable_display() {
        let error = ParloError::Unreachable {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Backend unreachable: connection refused"
        );
    }

    #[test]
    fn test_rejected_by_policy_display() {
        let error = ParloError::RejectedByPolicy {
            message: "origin not allowed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Request rejected by server policy: origin not allowed"
        );
    }

    #[test]
    fn test_server_display() {
        let error = ParloError::Server {
            status: 500,
            body: "internal error".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Backend returned HTTP 500: internal error"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = ParloError::Timeout { seconds: 60 };
        assert_eq!(error.to_string(), "Backend did not respond within 60s");
    }

    #[test]
    fn test_malformed_response_display() {
        let error = ParloError::MalformedResponse {
            message: "missing field text_output".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed backend response: missing field text_output"
        );
    }

    #[test]
    fn test_other_display() {
        let error = ParloError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ParloError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: ParloError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(ParloError::Other("test error".to_string()))
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: ParloError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ParloError>();
        assert_sync::<ParloError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = ParloError::Server {
            status: 404,
            body: "not found".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("Server"));
        assert!(debug_str.contains("404"));
    }
}

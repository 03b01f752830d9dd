//! Default configuration constants for parlo.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default inference backend base URL.
///
/// Points at a locally-running backend. Override with `[backend] base_url`
/// in the config file, `PARLO_BACKEND_URL`, or `--server`.
pub const BASE_URL: &str = "http://localhost:8000";

/// Path of the audio inference endpoint, relative to the base URL.
pub const UPLOAD_PATH: &str = "/api/infer_audio/";

/// Path of the connectivity probe, relative to the base URL.
///
/// Any 2xx response from this endpoint means the backend is reachable.
pub const PROBE_PATH: &str = "/docs";

/// Multipart field name carrying the recorded audio.
pub const AUDIO_FIELD: &str = "upload_audio_prompt";

/// Multipart field name carrying the optional user name.
pub const NAME_FIELD: &str = "text_input";

/// Canonical filename attached to the uploaded audio part.
pub const UPLOAD_FILENAME: &str = "recording.wav";

/// Delimiter tag bracketing the transcript in the backend's text output.
///
/// The transcript is the substring strictly between the first pair of tags.
/// Text without a complete tag pair passes through unchanged.
pub const TRANSCRIPT_TAG: &str = "[EN]";

/// Default upload timeout in seconds.
///
/// An unresponsive backend fails the session instead of stalling it forever.
pub const TIMEOUT_SECS: u64 = 60;

/// Default filename for the locally-saved recording.
pub const RECORDING_FILENAME: &str = "recording.wav";

/// Default filename for the downloaded corrected audio.
pub const CORRECTED_FILENAME: &str = "corrected.wav";

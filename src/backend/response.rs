//! Interpretation of the inference backend's reply.

use crate::defaults;
use crate::error::{ParloError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

/// JSON payload returned by the inference endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceResponse {
    /// Raw text output, possibly containing a tagged transcript region.
    pub text_output: String,
    /// Location of the corrected audio, relative to the backend or absolute.
    #[serde(default)]
    pub audio_url: String,
    /// Corrected audio bytes embedded as base64, preferred over `audio_url`.
    #[serde(default)]
    pub audio_data: Option<String>,
    /// Optional advisory message from the backend.
    #[serde(default)]
    pub warning: Option<String>,
}

/// Where the corrected audio can be fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectedAudio {
    /// Decoded audio bytes delivered inline with the response.
    Inline(Vec<u8>),
    /// Fully-resolved URL to fetch the audio from.
    Remote(String),
}

impl InferenceResponse {
    /// The transcript portion of `text_output`.
    ///
    /// The backend brackets the transcript between a pair of delimiter tags.
    /// The substring strictly between the first pair is returned, trimmed.
    /// Text without a complete tag pair passes through unchanged.
    pub fn transcript(&self) -> String {
        extract_transcript(&self.text_output)
    }

    /// Resolve the corrected audio, preferring inline bytes over the URL.
    ///
    /// # Errors
    /// Returns `ParloError::MalformedResponse` if the inline base64 payload
    /// does not decode, or if the response carries neither inline bytes nor
    /// a URL.
    pub fn corrected_audio(&self, base_url: &str) -> Result<CorrectedAudio> {
        if let Some(data) = self.audio_data.as_deref()
            && !data.is_empty()
        {
            let bytes = BASE64
                .decode(data)
                .map_err(|e| ParloError::MalformedResponse {
                    message: format!("invalid base64 in audio_data: {}", e),
                })?;
            return Ok(CorrectedAudio::Inline(bytes));
        }

        if self.audio_url.is_empty() {
            return Err(ParloError::MalformedResponse {
                message: "response carries neither audio_data nor audio_url".to_string(),
            });
        }

        Ok(CorrectedAudio::Remote(resolve_audio_url(
            &self.audio_url,
            base_url,
        )))
    }
}

/// Extract the delimited transcript from the backend's text output.
pub fn extract_transcript(text: &str) -> String {
    let tag = defaults::TRANSCRIPT_TAG;

    let Some(open) = text.find(tag) else {
        return text.to_string();
    };
    let after_open = open + tag.len();
    let Some(close) = text[after_open..].find(tag) else {
        // Single tag, no pair to match
        return text.to_string();
    };

    text[after_open..after_open + close].trim().to_string()
}

/// Resolve an audio path from the backend into a fetchable URL.
///
/// Absolute URLs and local file paths pass through unchanged. Anything
/// else is treated as relative to the backend base URL.
pub fn resolve_audio_url(path: &str, base_url: &str) -> String {
    if path.starts_with("http") || path.starts_with("file:") {
        return path.to_string();
    }
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: &str, url: &str, data: Option<&str>) -> InferenceResponse {
        InferenceResponse {
            text_output: text.to_string(),
            audio_url: url.to_string(),
            audio_data: data.map(str::to_string),
            warning: None,
        }
    }

    #[test]
    fn extract_transcript_between_tag_pair_trimmed() {
        assert_eq!(extract_transcript("[EN] hello [EN] trailing"), "hello");
    }

    #[test]
    fn extract_transcript_without_tags_passes_through() {
        assert_eq!(extract_transcript("plain text"), "plain text");
    }

    #[test]
    fn extract_transcript_with_single_tag_passes_through() {
        assert_eq!(extract_transcript("[EN] unclosed"), "[EN] unclosed");
    }

    #[test]
    fn extract_transcript_empty_region_yields_empty_string() {
        assert_eq!(extract_transcript("[EN][EN]"), "");
        assert_eq!(extract_transcript("[EN]   [EN]"), "");
    }

    #[test]
    fn extract_transcript_ignores_text_outside_first_pair() {
        assert_eq!(
            extract_transcript("prefix [EN] inner [EN] suffix [EN] more"),
            "inner"
        );
    }

    #[test]
    fn extract_transcript_empty_input() {
        assert_eq!(extract_transcript(""), "");
    }

    #[test]
    fn resolve_audio_url_prepends_base_for_relative_path() {
        assert_eq!(
            resolve_audio_url("/audio/test.wav", "http://api.test"),
            "http://api.test/audio/test.wav"
        );
    }

    #[test]
    fn resolve_audio_url_keeps_absolute_url() {
        assert_eq!(
            resolve_audio_url("http://cdn.example/a.wav", "http://api.test"),
            "http://cdn.example/a.wav"
        );
        assert_eq!(
            resolve_audio_url("https://cdn.example/a.wav", "http://api.test"),
            "https://cdn.example/a.wav"
        );
    }

    #[test]
    fn resolve_audio_url_keeps_local_reference() {
        assert_eq!(
            resolve_audio_url("file:///tmp/corrected.wav", "http://api.test"),
            "file:///tmp/corrected.wav"
        );
    }

    #[test]
    fn resolve_audio_url_handles_trailing_slash_base() {
        assert_eq!(
            resolve_audio_url("/audio/test.wav", "http://api.test/"),
            "http://api.test/audio/test.wav"
        );
    }

    #[test]
    fn corrected_audio_prefers_inline_data_over_url() {
        // "RIFF" base64-encoded
        let resp = response("", "/audio/test.wav", Some("UklGRg=="));

        let audio = resp.corrected_audio("http://api.test").unwrap();

        assert_eq!(audio, CorrectedAudio::Inline(b"RIFF".to_vec()));
    }

    #[test]
    fn corrected_audio_falls_back_to_url_when_inline_absent() {
        let resp = response("", "/audio/test.wav", None);

        let audio = resp.corrected_audio("http://api.test").unwrap();

        assert_eq!(
            audio,
            CorrectedAudio::Remote("http://api.test/audio/test.wav".to_string())
        );
    }

    #[test]
    fn corrected_audio_treats_empty_inline_as_absent() {
        let resp = response("", "/audio/test.wav", Some(""));

        let audio = resp.corrected_audio("http://api.test").unwrap();

        assert_eq!(
            audio,
            CorrectedAudio::Remote("http://api.test/audio/test.wav".to_string())
        );
    }

    #[test]
    fn corrected_audio_rejects_invalid_base64() {
        let resp = response("", "/audio/test.wav", Some("not base64!!!"));

        let result = resp.corrected_audio("http://api.test");

        assert!(result.is_err());
        match result {
            Err(ParloError::MalformedResponse { message }) => {
                assert!(message.contains("base64"));
            }
            _ => panic!("Expected MalformedResponse error"),
        }
    }

    #[test]
    fn corrected_audio_rejects_missing_audio_fields() {
        let resp = response("", "", None);

        let result = resp.corrected_audio("http://api.test");

        assert!(result.is_err());
        match result {
            Err(ParloError::MalformedResponse { message }) => {
                assert!(message.contains("neither"));
            }
            _ => panic!("Expected MalformedResponse error"),
        }
    }

    #[test]
    fn deserializes_full_payload() {
        let json = r#"{
            "text_output": "[EN] good morning [EN]",
            "audio_url": "/audio/out.wav",
            "audio_data": "UklGRg==",
            "warning": "low confidence"
        }"#;

        let resp: InferenceResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.transcript(), "good morning");
        assert_eq!(resp.audio_url, "/audio/out.wav");
        assert_eq!(resp.audio_data.as_deref(), Some("UklGRg=="));
        assert_eq!(resp.warning.as_deref(), Some("low confidence"));
    }

    #[test]
    fn deserializes_minimal_payload() {
        let json = r#"{"text_output": "hello"}"#;

        let resp: InferenceResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.text_output, "hello");
        assert_eq!(resp.audio_url, "");
        assert!(resp.audio_data.is_none());
        assert!(resp.warning.is_none());
    }

    #[test]
    fn deserialization_fails_without_text_output() {
        let json = r#"{"audio_url": "/audio/out.wav"}"#;

        assert!(serde_json::from_str::<InferenceResponse>(json).is_err());
    }
}

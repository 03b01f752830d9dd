//! HTTP client for the inference backend.

use crate::backend::response::InferenceResponse;
use crate::defaults;
use crate::error::{ParloError, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::multipart::{Form, Part};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Join a base URL and an absolute endpoint path.
fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Client for the audio inference backend.
///
/// Wraps a single `reqwest::Client` with the configured base URL and
/// request timeout. All transport failures are classified into structured
/// error kinds so callers never have to inspect message text.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a client for the given backend.
    ///
    /// # Errors
    /// Returns `ParloError::Other` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ParloError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// The configured backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the audio inference endpoint.
    pub fn upload_url(&self) -> String {
        join_url(&self.base_url, defaults::UPLOAD_PATH)
    }

    /// Full URL of the connectivity probe endpoint.
    pub fn probe_url(&self) -> String {
        join_url(&self.base_url, defaults::PROBE_PATH)
    }

    /// Classify a transport-level failure into a structured error kind.
    fn classify_transport_error(&self, e: reqwest::Error) -> ParloError {
        if e.is_timeout() {
            ParloError::Timeout {
                seconds: self.timeout_secs,
            }
        } else if e.is_connect() || e.is_request() {
            ParloError::Unreachable {
                message: e.to_string(),
            }
        } else {
            ParloError::Other(format!("HTTP request failed: {e}"))
        }
    }

    /// Upload an encoded WAV artifact for inference.
    ///
    /// Builds a multipart form with the audio bytes under the canonical
    /// field name and filename, plus the optional user name, and POSTs it
    /// to the inference endpoint.
    ///
    /// # Errors
    /// - `ParloError::Unreachable` if the backend cannot be contacted
    /// - `ParloError::Timeout` if no response arrives within the configured window
    /// - `ParloError::RejectedByPolicy` on HTTP 403
    /// - `ParloError::Server` on any other non-2xx status
    /// - `ParloError::MalformedResponse` if the body is not the expected JSON
    pub async fn infer(
        &self,
        audio: Vec<u8>,
        user_name: Option<&str>,
    ) -> Result<InferenceResponse> {
        let audio_part = Part::bytes(audio)
            .file_name(defaults::UPLOAD_FILENAME)
            .mime_str("audio/wav")
            .map_err(|e| ParloError::Other(format!("Failed to build multipart form: {e}")))?;

        let mut form = Form::new().part(defaults::AUDIO_FIELD, audio_part);
        if let Some(name) = user_name {
            form = form.text(defaults::NAME_FIELD, name.to_string());
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ParloError::RejectedByPolicy { message: body });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ParloError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| ParloError::MalformedResponse {
            message: format!("{e}"),
        })
    }

    /// Check whether the backend is reachable.
    ///
    /// Issues a GET against the probe endpoint; any 2xx response counts
    /// as reachable.
    pub async fn probe(&self) -> Result<()> {
        let response = self
            .client
            .get(self.probe_url())
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ParloError::Server {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Download a file from the backend to a local path, streaming to disk.
    ///
    /// Used to fetch corrected audio when the backend returns a URL instead
    /// of inline bytes. Shows a progress bar when `progress` is true.
    pub async fn download(&self, url: &str, output_path: &Path, progress: bool) -> Result<()> {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParloError::Server {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let total_size = response.content_length().unwrap_or(0);

        let pb = if progress {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                // SAFETY: hardcoded template string, always valid
                #[allow(clippy::expect_used)]
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("hardcoded progress bar template")
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stream = response.bytes_stream();
        let mut file = fs::File::create(output_path)?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.classify_transport_error(e))?;
            file.write_all(&chunk)?;

            if let Some(ref pb) = pb {
                pb.inc(chunk.len() as u64);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("Downloaded");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_inserts_no_double_slash() {
        assert_eq!(
            join_url("http://api.test/", "/api/infer_audio/"),
            "http://api.test/api/infer_audio/"
        );
        assert_eq!(
            join_url("http://api.test", "/api/infer_audio/"),
            "http://api.test/api/infer_audio/"
        );
    }

    #[test]
    fn client_builds_endpoint_urls() {
        let client = BackendClient::new("http://localhost:8000", 60).unwrap();

        assert_eq!(
            client.upload_url(),
            "http://localhost:8000/api/infer_audio/"
        );
        assert_eq!(client.probe_url(), "http://localhost:8000/docs");
    }

    #[test]
    fn client_strips_trailing_slash_from_base() {
        let client = BackendClient::new("http://localhost:8000/", 60).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.upload_url(),
            "http://localhost:8000/api/infer_audio/"
        );
    }

    #[tokio::test]
    async fn infer_against_unreachable_backend_classifies_as_unreachable() {
        // Nothing listens on this port; connection is refused immediately.
        let client = BackendClient::new("http://127.0.0.1:1", 5).unwrap();

        let result = client.infer(vec![0u8; 16], None).await;

        assert!(result.is_err());
        match result {
            Err(ParloError::Unreachable { .. }) => {}
            Err(other) => panic!("Expected Unreachable error, got: {other}"),
            Ok(_) => panic!("Expected error"),
        }
    }

    #[tokio::test]
    async fn probe_against_unreachable_backend_classifies_as_unreachable() {
        let client = BackendClient::new("http://127.0.0.1:1", 5).unwrap();

        let result = client.probe().await;

        assert!(result.is_err());
        match result {
            Err(ParloError::Unreachable { .. }) => {}
            Err(other) => panic!("Expected Unreachable error, got: {other}"),
            Ok(_) => panic!("Expected error"),
        }
    }
}

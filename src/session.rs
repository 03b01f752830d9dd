//! Recording session management for the practice pipeline.
//!
//! Tracks one record → encode → upload cycle as an explicit state machine
//! and tags each cycle with a session id so late upload responses from a
//! superseded session can be recognized and discarded.

use crate::audio::encoder;
use crate::audio::recorder::AudioSource;
use crate::error::{ParloError, Result};
use std::time::Duration;

/// Pipeline stage of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    Encoding,
    Uploading,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Encoding => "encoding",
            SessionState::Uploading => "uploading",
        };
        write!(f, "{name}")
    }
}

/// Encoded WAV artifact produced from one session's captured samples.
///
/// Immutable once produced; a new recording supersedes it rather than
/// mutating it. Carries the id of the session that produced it so the
/// upload response can be matched back.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub session_id: u64,
    pub wav: Vec<u8>,
    pub sample_rate: u32,
}

/// Manages one recording session at a time over an audio source.
///
/// Transitions: Idle → Recording (start) → Encoding (stop) → Uploading
/// (encode success) → Idle (response consumed). An encode failure returns
/// the session to Idle with the error propagated to the caller. Starting
/// a new recording while an upload is still in flight bumps the session
/// id, so the stale response fails the `is_current` check and is dropped.
pub struct PracticeSession<A: AudioSource> {
    audio_source: A,
    state: SessionState,
    session_id: u64,
    chunks: Vec<Vec<f32>>,
}

impl<A: AudioSource> PracticeSession<A> {
    /// Create a session manager over the given audio source.
    pub fn new(audio_source: A) -> Self {
        Self {
            audio_source,
            state: SessionState::Idle,
            session_id: 0,
            chunks: Vec::new(),
        }
    }

    /// Current pipeline stage.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the current (most recent) session.
    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Whether a response tagged with `session_id` belongs to the current
    /// session. Stale responses from superseded sessions must be dropped.
    pub fn is_current(&self, session_id: u64) -> bool {
        session_id == self.session_id
    }

    /// The sample rate the audio source delivers samples at.
    pub fn sample_rate(&self) -> u32 {
        self.audio_source.sample_rate()
    }

    /// Total recorded duration so far.
    pub fn recorded_duration(&self) -> Duration {
        let rate = self.audio_source.sample_rate();
        if rate == 0 {
            return Duration::ZERO;
        }
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        Duration::from_secs_f64(total as f64 / rate as f64)
    }

    /// Begin a new recording session.
    ///
    /// Allowed from Idle, or from Uploading to supersede an in-flight
    /// session. Discards any previously buffered samples and bumps the
    /// session id.
    ///
    /// # Errors
    /// Returns an error if called mid-recording or mid-encode, or if the
    /// audio source fails to start.
    pub fn start_recording(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::Uploading => {}
            other => {
                return Err(ParloError::Other(format!(
                    "cannot start recording while {other}"
                )));
            }
        }

        self.chunks.clear();
        self.session_id += 1;
        self.audio_source.start()?;
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Drain buffered samples from the source into the session.
    ///
    /// # Returns
    /// The number of samples appended.
    pub fn poll_samples(&mut self) -> Result<usize> {
        if self.state != SessionState::Recording {
            return Err(ParloError::Other(format!(
                "cannot poll samples while {}",
                self.state
            )));
        }

        let samples = self.audio_source.read_samples()?;
        let count = samples.len();
        if count > 0 {
            self.chunks.push(samples);
        }
        Ok(count)
    }

    /// Stop capturing and move to the encoding stage.
    ///
    /// Drains any samples still buffered in the source before stopping so
    /// the tail of the recording is not lost.
    pub fn stop_recording(&mut self) -> Result<()> {
        if self.state != SessionState::Recording {
            return Err(ParloError::Other(format!(
                "cannot stop recording while {}",
                self.state
            )));
        }

        let tail = self.audio_source.read_samples()?;
        if !tail.is_empty() {
            self.chunks.push(tail);
        }
        self.audio_source.stop()?;
        self.state = SessionState::Encoding;
        Ok(())
    }

    /// Encode the captured samples into a WAV artifact.
    ///
    /// On success the session advances to Uploading and the buffered
    /// samples are consumed. On failure the session returns to Idle and
    /// the error propagates to the caller, who must surface it to the
    /// user rather than swallow it.
    pub fn encode_artifact(&mut self) -> Result<Artifact> {
        if self.state != SessionState::Encoding {
            return Err(ParloError::Other(format!(
                "cannot encode while {}",
                self.state
            )));
        }

        let merged = encoder::merge_chunks(&self.chunks);
        let rate = self.audio_source.sample_rate();
        match encoder::encode_wav(&merged, rate) {
            Ok(wav) => {
                self.chunks.clear();
                self.state = SessionState::Uploading;
                Ok(Artifact {
                    session_id: self.session_id,
                    wav,
                    sample_rate: rate,
                })
            }
            Err(e) => {
                self.chunks.clear();
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    /// Consume the upload response for the given session.
    ///
    /// # Returns
    /// `true` if the response belongs to the current session, which also
    /// returns the session to Idle. `false` if it is stale and must be
    /// discarded; the current session's state is left untouched.
    pub fn finish_upload(&mut self, session_id: u64) -> bool {
        if !self.is_current(session_id) {
            return false;
        }
        if self.state == SessionState::Uploading {
            self.state = SessionState::Idle;
        }
        true
    }

    /// Abort the current session and return to Idle, releasing the device.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == SessionState::Recording {
            self.audio_source.stop()?;
        }
        self.chunks.clear();
        self.state = SessionState::Idle;
        Ok(())
    }
}

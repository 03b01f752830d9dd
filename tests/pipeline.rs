//! End-to-end tests of the practice pipeline over a mock audio source:
//! record → encode → response handling, without a live backend.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parlo::audio::recorder::MockAudioSource;
use parlo::{
    CorrectedAudio, InferenceResponse, ParloError, PracticeSession, SessionState,
};
use std::io::Cursor;

fn decode_wav(wav: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::new(Cursor::new(wav)).expect("artifact should parse as WAV");
    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .samples::<i16>()
        .map(|s| s.expect("sample should decode"))
        .collect();
    (spec, samples)
}

#[test]
fn full_cycle_produces_parseable_wav() {
    let source = MockAudioSource::new()
        .with_samples(vec![0.5f32; 441])
        .with_sample_rate(44_100);
    let mut session = PracticeSession::new(source);

    session.start_recording().expect("start should succeed");
    for _ in 0..3 {
        assert_eq!(session.poll_samples().expect("poll should succeed"), 441);
    }
    session.stop_recording().expect("stop should succeed");
    let artifact = session.encode_artifact().expect("encode should succeed");

    let (spec, samples) = decode_wav(&artifact.wav);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    // 3 polls plus the tail drained by stop_recording
    assert_eq!(samples.len(), 441 * 4);
    assert_eq!(artifact.sample_rate, 44_100);
    assert_eq!(session.state(), SessionState::Uploading);
}

#[test]
fn superseded_upload_is_discarded() {
    let source = MockAudioSource::new().with_samples(vec![0.1f32; 100]);
    let mut session = PracticeSession::new(source);

    session.start_recording().expect("start should succeed");
    session.stop_recording().expect("stop should succeed");
    let stale = session.encode_artifact().expect("encode should succeed");

    // A new take begins while the first upload is still in flight
    session.start_recording().expect("restart should succeed");
    session.stop_recording().expect("stop should succeed");
    let current = session.encode_artifact().expect("encode should succeed");

    assert!(!session.finish_upload(stale.session_id));
    assert_eq!(session.state(), SessionState::Uploading);

    assert!(session.finish_upload(current.session_id));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn encode_failure_surfaces_and_resets_to_idle() {
    // A source that never delivers samples produces an empty buffer
    let source = MockAudioSource::new().with_samples(vec![]);
    let mut session = PracticeSession::new(source);

    session.start_recording().expect("start should succeed");
    session.stop_recording().expect("stop should succeed");

    let result = session.encode_artifact();
    match result {
        Err(ParloError::Encode { message }) => {
            assert_eq!(message, "zero-length sample buffer");
        }
        other => panic!("Expected Encode error, got: {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Idle);

    // The session is usable again after the failure
    session.start_recording().expect("restart should succeed");
    assert_eq!(session.state(), SessionState::Recording);
}

#[test]
fn inline_corrected_audio_round_trips_through_response() {
    let source = MockAudioSource::new().with_samples(vec![0.25f32; 480]);
    let mut session = PracticeSession::new(source);

    session.start_recording().expect("start should succeed");
    session.poll_samples().expect("poll should succeed");
    session.stop_recording().expect("stop should succeed");
    let artifact = session.encode_artifact().expect("encode should succeed");

    // Backend echoes the audio back inline, as base64
    let json = format!(
        r#"{{
            "text_output": "[EN] the quick brown fox [EN]",
            "audio_url": "/audio/corrected.wav",
            "audio_data": "{}"
        }}"#,
        BASE64.encode(&artifact.wav)
    );
    let response: InferenceResponse =
        serde_json::from_str(&json).expect("payload should deserialize");

    assert_eq!(response.transcript(), "the quick brown fox");

    let audio = response
        .corrected_audio("http://localhost:8000")
        .expect("corrected audio should resolve");
    match audio {
        CorrectedAudio::Inline(bytes) => {
            assert_eq!(bytes, artifact.wav);
            let (spec, _) = decode_wav(&bytes);
            assert_eq!(spec.channels, 1);
        }
        CorrectedAudio::Remote(url) => panic!("Expected inline audio, got URL: {url}"),
    }
}

#[test]
fn remote_corrected_audio_resolves_against_backend() {
    let json = r#"{
        "text_output": "[EN] good morning [EN]",
        "audio_url": "/audio/out.wav"
    }"#;
    let response: InferenceResponse =
        serde_json::from_str(json).expect("payload should deserialize");

    let audio = response
        .corrected_audio("http://10.0.0.5:8000/")
        .expect("corrected audio should resolve");

    assert_eq!(
        audio,
        CorrectedAudio::Remote("http://10.0.0.5:8000/audio/out.wav".to_string())
    );
}

#[test]
fn untagged_text_output_passes_through_as_transcript() {
    let json = r#"{"text_output": "backend without delimiters"}"#;
    let response: InferenceResponse =
        serde_json::from_str(json).expect("payload should deserialize");

    assert_eq!(response.transcript(), "backend without delimiters");
}

#[test]
fn recorded_duration_tracks_polled_samples() {
    let source = MockAudioSource::new()
        .with_samples(vec![0.0f32; 4_800])
        .with_sample_rate(48_000);
    let mut session = PracticeSession::new(source);

    session.start_recording().expect("start should succeed");
    for _ in 0..5 {
        session.poll_samples().expect("poll should succeed");
    }

    // 5 polls of 100ms each
    assert_eq!(session.recorded_duration().as_millis(), 500);
}

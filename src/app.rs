//! Pronunciation practice application entry point.
//!
//! Orchestrates the complete practice flow:
//! record → encode → upload → render

use crate::audio::capture::{CpalAudioSource, suppress_audio_warnings};
use crate::audio::recorder::AudioSource;
use crate::backend::client::BackendClient;
use crate::backend::response::{CorrectedAudio, InferenceResponse};
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::session::{Artifact, PracticeSession};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run the practice command: record → encode → upload → show the result.
///
/// # Arguments
/// * `config` - Base configuration (can be overridden by CLI args)
/// * `device` - Optional device override from CLI
/// * `server` - Optional backend base URL override from CLI
/// * `name` - Optional user name override from CLI
/// * `duration` - Optional recording limit in seconds from CLI
/// * `save_recording` - Save the recorded WAV to this path before uploading
/// * `corrected` - Where to put the corrected audio (default from config)
/// * `no_corrected` - Skip fetching the corrected audio entirely
/// * `quiet` - Suppress status messages
///
/// # Returns
/// Ok(()) on success, or an error if any step fails
#[allow(clippy::too_many_arguments)]
pub async fn run_practice_command(
    mut config: Config,
    device: Option<String>,
    server: Option<String>,
    name: Option<String>,
    duration: Option<u64>,
    save_recording: Option<PathBuf>,
    corrected: Option<PathBuf>,
    no_corrected: bool,
    quiet: bool,
) -> Result<()> {
    // Suppress noisy JACK/ALSA warnings before audio init
    suppress_audio_warnings();

    // Apply CLI overrides
    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(s) = server {
        config.backend.base_url = s;
    }
    if let Some(n) = name {
        config.backend.user_name = Some(n);
    }
    if let Some(secs) = duration {
        config.audio.max_duration_secs = Some(secs);
    }

    // Fail on a bad backend URL before touching the microphone
    let client = BackendClient::new(&config.backend.base_url, config.backend.timeout_secs)?;

    let source = CpalAudioSource::new(config.audio.device.as_deref())?;
    let mut session = PracticeSession::new(source);

    let max_duration = config.audio.max_duration_secs.map(Duration::from_secs);
    let artifact = record_artifact(&mut session, max_duration, quiet).await?;
    let Artifact {
        session_id, wav, ..
    } = artifact;

    if let Some(path) = save_recording {
        write_wav(&path, &wav)?;
        if !quiet {
            output::render_saved("Recording", &path);
        }
    }

    if !quiet {
        eprintln!("Uploading {} bytes to {}...", wav.len(), client.upload_url());
    }

    let response = client
        .infer(wav, config.backend.user_name.as_deref())
        .await?;

    if !session.finish_upload(session_id) {
        // Response belongs to a superseded session
        return Ok(());
    }

    output::render_result(&response.transcript(), response.warning.as_deref());

    if !no_corrected {
        let path = resolve_output_path(corrected, &config.output.corrected_path);
        fetch_corrected(&client, &response, &path, quiet).await?;
    }

    Ok(())
}

/// Run the record command: capture audio and save it locally, no upload.
pub async fn run_record_command(
    mut config: Config,
    device: Option<String>,
    duration: Option<u64>,
    output_path: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    suppress_audio_warnings();

    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(secs) = duration {
        config.audio.max_duration_secs = Some(secs);
    }

    let source = CpalAudioSource::new(config.audio.device.as_deref())?;
    let mut session = PracticeSession::new(source);

    let max_duration = config.audio.max_duration_secs.map(Duration::from_secs);
    let artifact = record_artifact(&mut session, max_duration, quiet).await?;

    let path = resolve_output_path(output_path, &config.output.recording_path);
    write_wav(&path, &artifact.wav)?;
    if !quiet {
        output::render_saved("Recording", &path);
    }

    Ok(())
}

/// Run the upload command: send an existing WAV file for inference.
pub async fn run_upload_command(
    mut config: Config,
    file: PathBuf,
    server: Option<String>,
    name: Option<String>,
    corrected: Option<PathBuf>,
    no_corrected: bool,
    quiet: bool,
) -> Result<()> {
    if let Some(s) = server {
        config.backend.base_url = s;
    }
    if let Some(n) = name {
        config.backend.user_name = Some(n);
    }

    let wav = fs::read(&file)?;
    let client = BackendClient::new(&config.backend.base_url, config.backend.timeout_secs)?;

    if !quiet {
        eprintln!(
            "Uploading {} ({} bytes) to {}...",
            file.display(),
            wav.len(),
            client.upload_url()
        );
    }

    let response = client
        .infer(wav, config.backend.user_name.as_deref())
        .await?;

    output::render_result(&response.transcript(), response.warning.as_deref());

    if !no_corrected {
        let path = resolve_output_path(corrected, &config.output.corrected_path);
        fetch_corrected(&client, &response, &path, quiet).await?;
    }

    Ok(())
}

/// Record until Enter is pressed or the duration limit is reached, then
/// encode the captured samples into a WAV artifact.
///
/// Samples are drained from the source every 100ms so the device buffer
/// never grows unbounded. Stdin is watched from a detached thread so a
/// pending read never blocks process shutdown.
async fn record_artifact<A: AudioSource>(
    session: &mut PracticeSession<A>,
    max_duration: Option<Duration>,
    quiet: bool,
) -> Result<Artifact> {
    session.start_recording()?;
    if !quiet {
        eprintln!(
            "Recording at {} Hz. Press Enter to stop.",
            session.sample_rate()
        );
    }

    let (tx, mut stop) = tokio::sync::oneshot::channel::<()>();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = tx.send(());
    });

    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                session.poll_samples()?;
                let elapsed = session.recorded_duration();
                if !quiet {
                    output::render_recording_meter(elapsed, max_duration);
                }
                if let Some(max) = max_duration
                    && elapsed >= max
                {
                    break;
                }
            }
        }
    }

    if !quiet {
        output::clear_line();
        eprintln!("Recorded {}.", output::format_duration(session.recorded_duration()));
    }

    session.stop_recording()?;
    session.encode_artifact()
}

/// Fetch the corrected audio and write it to `path`.
///
/// Inline bytes are written directly; a remote URL is streamed down with
/// a progress bar unless `quiet`. A response without any corrected audio
/// is reported but not fatal, the transcript has already been shown.
async fn fetch_corrected(
    client: &BackendClient,
    response: &InferenceResponse,
    path: &Path,
    quiet: bool,
) -> Result<()> {
    match response.corrected_audio(client.base_url()) {
        Ok(CorrectedAudio::Inline(bytes)) => {
            write_wav(path, &bytes)?;
        }
        Ok(CorrectedAudio::Remote(url)) => {
            client.download(&url, path, !quiet).await?;
        }
        Err(e) => {
            if !quiet {
                eprintln!("No corrected audio available: {e}");
            }
            return Ok(());
        }
    }

    if !quiet {
        output::render_saved("Corrected audio", path);
    }
    Ok(())
}

/// Pick the CLI override if given, otherwise the configured path.
fn resolve_output_path(override_path: Option<PathBuf>, configured: &str) -> PathBuf {
    override_path.unwrap_or_else(|| PathBuf::from(configured))
}

/// Write bytes to a path, creating parent directories as needed.
fn write_wav(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

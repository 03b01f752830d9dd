//! Shared terminal rendering for the practice flow.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces the recording meter etc.)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Format a duration as seconds with one decimal place.
pub fn format_duration(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}

/// Render the in-place recording meter on stderr.
///
/// Reuses a single terminal line so repeated calls overwrite each other
/// instead of scrolling.
pub fn render_recording_meter(elapsed: Duration, limit: Option<Duration>) {
    clear_line();
    match limit {
        Some(max) => eprint!(
            "Recording {} / {} {DIM}(Enter to stop){RESET}",
            format_duration(elapsed),
            format_duration(max),
        ),
        None => eprint!(
            "Recording {} {DIM}(Enter to stop){RESET}",
            format_duration(elapsed),
        ),
    }
    let _ = io::stderr().flush();
}

/// Render the transcript and any backend advisory.
///
/// The transcript goes to stdout so it can be piped; everything else
/// stays on stderr.
pub fn render_result(transcript: &str, warning: Option<&str>) {
    clear_line();
    if transcript.is_empty() {
        eprintln!("{DIM}(empty transcript){RESET}");
    } else {
        println!("{transcript}");
    }
    if let Some(warning) = warning {
        eprintln!("{YELLOW}Warning: {warning}{RESET}");
    }
}

/// Announce a file written to disk.
pub fn render_saved(label: &str, path: &Path) {
    eprintln!("{GREEN}{label} saved to {}{RESET}", path.display());
}

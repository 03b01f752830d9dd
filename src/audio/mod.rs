//! Audio capture and WAV encoding.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod encoder;
pub mod recorder;

//! WAV encoding of captured sample buffers.

use crate::error::{ParloError, Result};
use std::io::Cursor;

/// Concatenate buffered sample chunks into one contiguous buffer.
///
/// Chunk order is preserved and no samples are dropped or inserted, so the
/// output length is exactly the sum of the input chunk lengths.
pub fn merge_chunks(chunks: &[Vec<f32>]) -> Vec<f32> {
    let total: usize = chunks.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for chunk in chunks {
        merged.extend_from_slice(chunk);
    }
    merged
}

/// Serialize mono floating-point samples into a WAV byte buffer.
///
/// Produces a canonical PCM container: 1 channel, 16-bit signed samples,
/// at the given sample rate. Samples are clamped to [-1.0, 1.0] before
/// quantization. The output is a pure function of the inputs, so identical
/// samples and rate always produce byte-identical buffers.
///
/// # Errors
/// Returns `ParloError::Encode` if the sample buffer is empty, the sample
/// rate is zero, or the container serialization itself fails.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(ParloError::Encode {
            message: "zero-length sample buffer".to_string(),
        });
    }
    if sample_rate == 0 {
        return Err(ParloError::Encode {
            message: "sample rate must be non-zero".to_string(),
        });
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(|e| ParloError::Encode {
        message: format!("Failed to create WAV writer: {}", e),
    })?;

    for &sample in samples {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| ParloError::Encode {
                message: format!("Failed to write sample: {}", e),
            })?;
    }

    writer.finalize().map_err(|e| ParloError::Encode {
        message: format!("Failed to finalize WAV data: {}", e),
    })?;

    Ok(cursor.into_inner())
}

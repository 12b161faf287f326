//! WAV export via `hound`.
//!
//! The batch mode saves its processed recording as 32-bit float PCM, the
//! same representation the rest of the pipeline works in, so no samples are
//! requantised on the way to disk.

use std::path::Path;

use thiserror::Error;

/// Errors raised while writing a recording to disk.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("failed to write WAV file: {0}")]
    Write(#[from] hound::Error),
}

/// Write `samples` to `path` as a 32-bit float PCM WAV file.
///
/// Parent directories are not created; the batch mode writes into the
/// recordings directory prepared by [`crate::config::AppPaths`].
///
/// # Errors
///
/// Returns [`WavError::Write`] if the file cannot be created or a sample
/// fails to flush.
pub fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), WavError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;

    log::info!(
        "saved {} samples ({:.1} s) to {}",
        samples.len(),
        samples.len() as f32 / (sample_rate as f32 * channels as f32),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_float_samples() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.wav");

        let samples: Vec<f32> = (0..441).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        write_wav(&path, &samples, 44_100, 1).expect("write");

        let mut reader = hound::WavReader::open(&path).expect("open");
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
        assert_eq!(spec.bits_per_sample, 32);

        let read: Vec<f32> = reader
            .samples::<f32>()
            .map(|s| s.expect("sample"))
            .collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn empty_recording_produces_valid_header() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("empty.wav");

        write_wav(&path, &[], 44_100, 1).expect("write");

        let reader = hound::WavReader::open(&path).expect("open");
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("no-such-dir").join("out.wav");
        assert!(write_wav(&path, &[0.0], 44_100, 1).is_err());
    }
}

//! Batch mode — record, process, play back, save.
//!
//! Everything here is sequential and blocking; the realtime queues are not
//! involved.  The whole recording is treated as one large block: the same
//! pitch-shift + dither chain the worker applies per 512-sample block runs
//! here exactly once over the full capture.

use anyhow::{Context, Result};

use crate::audio::{write_wav, AudioDevice};
use crate::config::{AppPaths, PipelineConfig};
use crate::dsp::{dither_clamp, pitch_shift};

/// Apply the voice effect to a whole recording in place.
///
/// Split out of [`run_batch`] so the transform is testable without audio
/// hardware.
pub fn process_recording(samples: &mut [f32], config: &PipelineConfig) {
    pitch_shift(samples, config.audio.sample_rate, config.effect.pitch_steps);
    dither_clamp(samples, config.effect.dither_amplitude);
}

/// Record `duration_secs` of audio, anonymise it, play it back, and save it
/// as a WAV file in the recordings directory.
///
/// The WAV is written last — a failure anywhere earlier leaves no partial
/// output file behind.
///
/// # Errors
///
/// Device and file errors abort this mode and propagate to the menu; the
/// process keeps running.
pub fn run_batch(config: &PipelineConfig, duration_secs: u32) -> Result<()> {
    let num_samples = config.audio.sample_rate as usize
        * duration_secs as usize
        * config.audio.channels as usize;

    let device = AudioDevice::open(&config.audio).context("opening audio device")?;

    log::info!("[record] capturing {duration_secs} s of audio...");
    let mut samples = device
        .record(num_samples)
        .context("recording from input device")?;
    log::info!("[record] done ({} samples)", samples.len());

    log::info!("[process] applying voice effect...");
    process_recording(&mut samples, config);

    log::info!("[playback] playing processed audio...");
    device
        .play(samples.clone())
        .context("playing processed audio")?;
    log::info!("[playback] done");

    let paths = AppPaths::new();
    std::fs::create_dir_all(&paths.recordings_dir)
        .context("creating recordings directory")?;
    let out_path = paths.recordings_dir.join(&config.output.recording_file);
    write_wav(
        &out_path,
        &samples,
        config.audio.sample_rate,
        config.audio.channels,
    )
    .context("saving WAV file")?;

    println!("Saved processed recording to {}", out_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

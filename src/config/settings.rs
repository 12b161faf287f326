//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! The defaults reproduce the classic voice-anonymiser setup: 44.1 kHz mono,
//! 512-frame device blocks, 2 seconds of queue headroom and a 4-semitone
//! downshift.  Tests construct configs with much smaller values so the
//! pipeline runs fast without real hardware timing.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Stream and queue geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Stream sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per device callback block.
    pub block_frames: usize,
    /// Interleaved channel count (the pipeline is mono; kept configurable
    /// so the queue sizing stays correct if a duplex device forces 2).
    pub channels: u16,
    /// Seconds of audio each realtime queue can hold.  This bounds both the
    /// worst-case latency and how long the worker may fall behind before
    /// the device callback starts blocking.
    pub queue_secs: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_frames: 512,
            channels: 1,
            queue_secs: 2,
        }
    }
}

impl AudioConfig {
    /// Samples per queue operation (`block_frames × channels`).
    pub fn block_samples(&self) -> usize {
        self.block_frames * self.channels as usize
    }

    /// Storage slots for one realtime queue
    /// (`sample_rate × queue_secs × channels`).
    pub fn queue_capacity(&self) -> usize {
        self.sample_rate as usize * self.queue_secs as usize * self.channels as usize
    }
}

// ---------------------------------------------------------------------------
// EffectConfig
// ---------------------------------------------------------------------------

/// Voice-effect parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Pitch shift in semitones; negative lowers the voice.
    pub pitch_steps: i32,
    /// Uniform dither noise amplitude added after the pitch shift.
    pub dither_amplitude: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            pitch_steps: -4,
            dither_amplitude: crate::dsp::DEFAULT_DITHER_AMPLITUDE,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where batch-mode recordings end up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name for the saved WAV, created inside
    /// [`AppPaths::recordings_dir`].
    pub recording_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            recording_file: "recorded_mixed_audio.wav".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_changer::config::PipelineConfig;
///
/// // Load (returns Default when file is missing)
/// let config = PipelineConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stream and queue geometry.
    pub audio: AudioConfig,
    /// Voice-effect parameters.
    pub effect: EffectConfig,
    /// Recording output settings.
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(PipelineConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify default values match the original anonymiser constants.
    #[test]
    fn default_values() {
        let cfg = PipelineConfig::default();

        assert_eq!(cfg.audio.sample_rate, 44_100);
        assert_eq!(cfg.audio.block_frames, 512);
        assert_eq!(cfg.audio.channels, 1);
        assert_eq!(cfg.audio.queue_secs, 2);
        assert_eq!(cfg.effect.pitch_steps, -4);
        assert!((cfg.effect.dither_amplitude - 0.003).abs() < 1e-9);
        assert_eq!(cfg.output.recording_file, "recorded_mixed_audio.wav");
    }

    #[test]
    fn derived_sizes() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.audio.block_samples(), 512);
        // 2 seconds at 44.1 kHz mono
        assert_eq!(cfg.audio.queue_capacity(), 88_200);

        let stereo = AudioConfig {
            channels: 2,
            ..AudioConfig::default()
        };
        assert_eq!(stereo.block_samples(), 1_024);
        assert_eq!(stereo.queue_capacity(), 176_400);
    }

    /// Verify that a default config can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = PipelineConfig::default();
        original.save_to(&path).expect("save");

        let loaded = PipelineConfig::load_from(&path).expect("load");

        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(original.audio.block_frames, loaded.audio.block_frames);
        assert_eq!(original.audio.channels, loaded.audio.channels);
        assert_eq!(original.audio.queue_secs, loaded.audio.queue_secs);
        assert_eq!(original.effect.pitch_steps, loaded.effect.pitch_steps);
        assert_eq!(
            original.effect.dither_amplitude,
            loaded.effect.dither_amplitude
        );
        assert_eq!(original.output.recording_file, loaded.output.recording_file);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = PipelineConfig::load_from(&path).expect("should not error");
        assert_eq!(config.audio.sample_rate, 44_100);
        assert_eq!(config.effect.pitch_steps, -4);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = PipelineConfig::default();
        cfg.audio.sample_rate = 48_000;
        cfg.audio.block_frames = 256;
        cfg.effect.pitch_steps = 7;
        cfg.output.recording_file = "robot.wav".into();

        cfg.save_to(&path).expect("save");
        let loaded = PipelineConfig::load_from(&path).expect("load");

        assert_eq!(loaded.audio.sample_rate, 48_000);
        assert_eq!(loaded.audio.block_frames, 256);
        assert_eq!(loaded.effect.pitch_steps, 7);
        assert_eq!(loaded.output.recording_file, "robot.wav");
    }
}

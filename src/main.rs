//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG`, default `info`).
//! 2. Load [`PipelineConfig`] from disk (returns default on first run).
//! 3. Run the interactive menu until the user exits.

use anyhow::Result;

use voice_changer::cli;
use voice_changer::config::PipelineConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voice changer starting up");

    let config = PipelineConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        PipelineConfig::default()
    });
    log::debug!(
        "config: {} Hz, {} frames/block, {} semitones",
        config.audio.sample_rate,
        config.audio.block_frames,
        config.effect.pitch_steps
    );

    cli::run(&config)
}

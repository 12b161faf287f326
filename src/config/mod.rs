//! Configuration module for the voice changer.
//!
//! Provides `PipelineConfig` (top-level settings), sub-configs for the
//! audio geometry / effect / output, `AppPaths` for cross-platform data
//! directories, and TOML persistence via `PipelineConfig::load` /
//! `PipelineConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AudioConfig, EffectConfig, OutputConfig, PipelineConfig};

//! Signal processing — the voice-anonymising effect chain.
//!
//! ```text
//! raw block → pitch_shift (resample by 2^(steps/12)) → dither_clamp → out
//! ```
//!
//! Both passes operate in place on a single block; neither carries state
//! across blocks.

pub mod dither;
pub mod pitch;

pub use dither::{dither_clamp, DEFAULT_DITHER_AMPLITUDE};
pub use pitch::{pitch_factor, pitch_shift};

//! Dither pass applied after pitch shifting.
//!
//! Adds a small amount of uniform noise to mask the interpolation artifacts
//! of the resampler, then clamps every sample back into `[-1.0, 1.0]` so
//! the dither can never push a full-scale signal out of range.

use rand::Rng;

/// Default dither amplitude — noise is drawn from ±this value.
pub const DEFAULT_DITHER_AMPLITUDE: f32 = 0.003;

/// Add uniform noise in `[-amplitude, amplitude]` to every sample of
/// `block`, then clamp each sample to `[-1.0, 1.0]`.
///
/// An `amplitude` of `0.0` reduces to a pure clamp pass.
///
/// # Example
///
/// ```rust
/// use voice_changer::dsp::dither_clamp;
///
/// let mut block = vec![0.0_f32, 1.0, -1.0];
/// dither_clamp(&mut block, 0.003);
/// assert!(block.iter().all(|s| (-1.0..=1.0).contains(s)));
/// ```
pub fn dither_clamp(block: &mut [f32], amplitude: f32) {
    let mut rng = rand::thread_rng();
    for sample in block.iter_mut() {
        let noise = if amplitude > 0.0 {
            rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        };
        *sample = (*sample + noise).clamp(-1.0, 1.0);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

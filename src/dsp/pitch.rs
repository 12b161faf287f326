//! Pitch shifting by linear-interpolation resampling.
//!
//! [`pitch_shift`] rereads a block at `2^(semitones/12)` times the original
//! rate: negative semitone counts stretch the waveform (lower voice),
//! positive counts compress it (higher voice).
//!
//! Each block is resampled **independently** — no read position or overlap
//! is carried across blocks.  For pitch factors away from 1.0 this produces
//! a periodic discontinuity at block boundaries.  That artifact is accepted:
//! the effect is a voice anonymiser, not a music-grade shifter, and the
//! roughness even helps mask the speaker.

// ---------------------------------------------------------------------------
// pitch_factor
// ---------------------------------------------------------------------------

/// Resampling ratio for a semitone offset: `2^(semitones / 12)`.
///
/// # Example
///
/// ```rust
/// use voice_changer::dsp::pitch_factor;
///
/// assert!((pitch_factor(0) - 1.0).abs() < 1e-6);
/// assert!((pitch_factor(12) - 2.0).abs() < 1e-6);
/// assert!((pitch_factor(-12) - 0.5).abs() < 1e-6);
/// ```
pub fn pitch_factor(semitones: i32) -> f32 {
    2.0_f32.powf(semitones as f32 / 12.0)
}

// ---------------------------------------------------------------------------
// pitch_shift
// ---------------------------------------------------------------------------

/// Pitch-shift `block` in place by `semitones` (signed, 12 per octave).
///
/// Walks a fractional read position through the block, advancing by the
/// pitch factor per output sample and linearly interpolating between the
/// two neighbouring input samples.  When the read position would pass the
/// last sample, the remainder of the block is filled with silence — the
/// transform never reads outside the block.
///
/// `semitones == 0` leaves the block unchanged.  The function is
/// deterministic: no hidden state, no randomness (dither is a separate
/// pass, see [`crate::dsp::dither_clamp`]).
///
/// `_sample_rate` does not affect the resampling ratio; it is part of the
/// signature so the transform slots into the same shape as rate-dependent
/// effects.
pub fn pitch_shift(block: &mut [f32], _sample_rate: u32, semitones: i32) {
    let n = block.len();
    if n == 0 {
        return;
    }

    let factor = pitch_factor(semitones);
    let mut scratch = vec![0.0_f32; n];
    let mut pos = 0.0_f32;

    for i in 0..n {
        let idx = pos as usize;
        let frac = pos - idx as f32;

        scratch[i] = if idx + 1 < n {
            block[idx] * (1.0 - frac) + block[idx + 1] * frac
        } else {
            // Upper neighbour is out of bounds: take the lower sample as-is.
            block[idx]
        };

        pos += factor;

        // Past the last interpolatable sample: the rest of the block stays
        // silent (scratch is zero-initialised).
        if pos >= (n - 1) as f32 {
            break;
        }
    }

    block.copy_from_slice(&scratch);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32 / (n - 1) as f32).collect()
    }

    // ---- pitch_factor ------------------------------------------------------

    #[test]
    fn factor_known_values() {
        assert!((pitch_factor(0) - 1.0).abs() < 1e-6);
        assert!((pitch_factor(12) - 2.0).abs() < 1e-6);
        assert!((pitch_factor(-12) - 0.5).abs() < 1e-6);
        // The default anonymiser setting.
        assert!((pitch_factor(-4) - 0.793_700_5).abs() < 1e-5);
    }

    // ---- Identity (steps = 0) ---------------------------------------------

    #[test]
    fn zero_steps_is_identity_on_512_block() {
        const N: usize = 512;
        let original = ramp(N);
        let mut block = original.clone();
        pitch_shift(&mut block, 44_100, 0);

        // With factor exactly 1.0, frac is always 0 and every sample is
        // copied through unchanged.  The read position reaches N-1 right
        // after producing sample N-2, so the tail rule silences exactly the
        // final sample and nothing before it.
        for i in 0..N - 1 {
            assert_eq!(block[i], original[i], "sample {i} changed under steps=0");
        }
        assert_eq!(block[N - 1], 0.0);
    }

    #[test]
    fn zero_steps_silences_only_the_final_sample() {
        let original: Vec<f32> = (0..300).map(|i| ((i * 37) % 101) as f32 / 50.0 - 1.0).collect();
        let mut block = original.clone();
        pitch_shift(&mut block, 48_000, 0);
        assert_eq!(&block[..299], &original[..299]);
        assert_eq!(block[299], 0.0);
    }

    // ---- Downshift (factor < 1) -------------------------------------------

    #[test]
    fn negative_steps_interpolate_ramp() {
        const N: usize = 512;
        let factor = pitch_factor(-4);
        let input = ramp(N);
        let mut block = input.clone();
        pitch_shift(&mut block, 44_100, -4);

        // factor < 1 never pushes the read position past N-1, so every
        // output sample is an interpolated ramp read at i * factor.
        let mut pos = 0.0_f32;
        for i in 0..N {
            let idx = pos as usize;
            let frac = pos - idx as f32;
            let expected = input[idx] * (1.0 - frac) + input[idx + 1] * frac;
            assert!(
                (block[i] - expected).abs() < 1e-5,
                "sample {i}: got {}, expected {expected}",
                block[i]
            );
            pos += factor;
        }
    }

    // ---- Upshift (factor > 1) ---------------------------------------------

    #[test]
    fn positive_steps_compress_ramp() {
        const N: usize = 512;
        let factor = pitch_factor(5);
        let input = ramp(N);
        let mut block = input.clone();
        pitch_shift(&mut block, 44_100, 5);

        // Output sample i reads the ramp at position i * factor, so the
        // ramp value grows `factor` times faster than the identity.
        let i = 100;
        let expected = (i as f32 * factor) / (N - 1) as f32;
        assert!((block[i] - expected).abs() < 1e-4);
    }

    #[test]
    fn upshift_leaves_exact_silent_tail() {
        // An octave up consumes the block twice as fast: the read position
        // hits N-1 near the halfway mark and the rest must be exactly zero.
        const N: usize = 256;
        let mut block = vec![1.0_f32; N];
        pitch_shift(&mut block, 44_100, 12);
        assert_eq!(block[0], 1.0);
        assert_eq!(block[100], 1.0);
        for (i, &s) in block.iter().enumerate().skip(N / 2 + 1) {
            assert_eq!(s, 0.0, "sample {i} should be in the silent tail");
        }
    }

    // ---- Determinism / degenerate input -----------------------------------

    #[test]
    fn deterministic_for_fixed_input() {
        let input: Vec<f32> = (0..512).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut a = input.clone();
        let mut b = input;
        pitch_shift(&mut a, 44_100, -4);
        pitch_shift(&mut b, 44_100, -4);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_input_stays_zero() {
        let mut block = vec![0.0_f32; 512];
        pitch_shift(&mut block, 44_100, -4);
        assert!(block.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_block_is_noop() {
        let mut block: Vec<f32> = Vec::new();
        pitch_shift(&mut block, 44_100, -4);
        assert!(block.is_empty());
    }
}

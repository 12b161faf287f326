//! Voice changer — a small real-time audio anonymiser.
//!
//! Captures microphone audio, pitch-shifts it down a few semitones with a
//! dither pass on top, and plays the result back with bounded latency.  Two
//! modes:
//!
//! * **Realtime** — device callbacks exchange fixed-size blocks with a
//!   processing worker through two blocking [`audio::BoundedAudioQueue`]s
//!   (microphone → headphones, ~2 s worst-case backpressure).
//! * **Batch** — record N seconds, process the whole take, play it back and
//!   save it as a 32-bit float WAV.
//!
//! Module map:
//!
//! * [`audio`]   — blocking queues, cpal streams, WAV export
//! * [`dsp`]     — pitch shift + dither effect chain
//! * [`pipeline`] — worker thread, session shutdown protocol, batch mode
//! * [`config`]  — TOML settings and platform paths
//! * [`cli`]     — interactive menu

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod pipeline;

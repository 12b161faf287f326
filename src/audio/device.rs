//! Audio device and stream lifecycle via `cpal`.
//!
//! [`AudioDevice`] wraps the cpal host/device/stream plumbing for both
//! modes:
//!
//! * **Realtime** — [`AudioDevice::start_realtime`] opens an input and an
//!   output stream whose callbacks talk only to the session's two
//!   [`BoundedAudioQueue`]s.  The returned [`RealtimeStreams`] is a RAII
//!   guard; dropping it stops both hardware streams on every exit path.
//! * **Batch** — [`AudioDevice::record`] and [`AudioDevice::play`] are
//!   blocking whole-buffer operations with no worker thread involved.
//!
//! # Callback contract
//!
//! The stream callbacks run on cpal's real-time audio threads.  They do no
//! allocation and no I/O; their only blocking points are the queue `push` /
//! `pop`.  With ~2 s of queue headroom those return immediately in steady
//! state — if the worker stalls long enough to fill the input queue the
//! callback blocks rather than dropping audio, which is the intended
//! backpressure policy.  When a queue reports termination the callback
//! raises the shared `stream_done` flag and from then on only writes
//! silence; the controller polls the flag instead of a PortAudio-style
//! "complete" return code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::BoundedAudioQueue;
use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// DeviceError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running audio streams.
///
/// All of these abort the current mode and return control to the menu; none
/// of them are fatal to the process.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no input device found on the default audio host")]
    NoInputDevice,

    #[error("no output device found on the default audio host")]
    NoOutputDevice,

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio stream failed: {0}")]
    StreamFailed(String),
}

// ---------------------------------------------------------------------------
// Stream failure reporting
// ---------------------------------------------------------------------------

/// Slot the stream error callback writes into; the first failure wins.
type FailureSlot = Arc<Mutex<Option<String>>>;

/// Poll until `done` reports true, bailing out with
/// [`DeviceError::StreamFailed`] as soon as the stream's error callback has
/// recorded a failure.  Without the bail-out a mid-capture device loss
/// would leave the batch mode polling forever.
fn wait_for_stream(done: impl Fn() -> bool, failure: &Mutex<Option<String>>) -> Result<(), DeviceError> {
    loop {
        if let Some(msg) = failure.lock().unwrap().take() {
            return Err(DeviceError::StreamFailed(msg));
        }
        if done() {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

// ---------------------------------------------------------------------------
// RealtimeStreams
// ---------------------------------------------------------------------------

/// RAII guard that keeps the realtime input and output streams alive.
///
/// Dropping this value stops both underlying hardware streams.
pub struct RealtimeStreams {
    _input: cpal::Stream,
    _output: cpal::Stream,
}

// ---------------------------------------------------------------------------
// AudioDevice
// ---------------------------------------------------------------------------

/// Default input + output device pair with a fixed stream geometry.
pub struct AudioDevice {
    input: cpal::Device,
    output: cpal::Device,
    config: cpal::StreamConfig,
}

impl AudioDevice {
    /// Open the system default input and output devices with the sample
    /// rate, channel count and block size from `audio`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NoInputDevice`] / [`NoOutputDevice`] when the
    /// default host has no usable device for that direction.
    pub fn open(audio: &AudioConfig) -> Result<Self, DeviceError> {
        let host = cpal::default_host();
        let input = host.default_input_device().ok_or(DeviceError::NoInputDevice)?;
        let output = host
            .default_output_device()
            .ok_or(DeviceError::NoOutputDevice)?;

        log::debug!(
            "audio devices: in = {:?}, out = {:?}",
            input.name().ok(),
            output.name().ok()
        );

        let config = cpal::StreamConfig {
            channels: audio.channels,
            sample_rate: cpal::SampleRate(audio.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(audio.block_frames as u32),
        };

        Ok(Self {
            input,
            output,
            config,
        })
    }

    // -----------------------------------------------------------------------
    // Realtime duplex streams
    // -----------------------------------------------------------------------

    /// Start the realtime capture/playback streams.
    ///
    /// The input callback pushes every captured block into `input_queue`;
    /// the output callback pops processed blocks from `output_queue`.  When
    /// either queue reports termination the callbacks set `stream_done` and
    /// emit silence from then on.
    pub fn start_realtime(
        &self,
        input_queue: Arc<BoundedAudioQueue>,
        output_queue: Arc<BoundedAudioQueue>,
        stream_done: Arc<AtomicBool>,
    ) -> Result<RealtimeStreams, DeviceError> {
        let done_in = Arc::clone(&stream_done);
        let input_stream = self.input.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if done_in.load(Ordering::Acquire) {
                    return;
                }
                if input_queue.push(data).is_err() {
                    // Queue terminated: the stream is complete, not broken.
                    done_in.store(true, Ordering::Release);
                }
            },
            {
                let done = Arc::clone(&stream_done);
                move |err: cpal::StreamError| {
                    // Overflow/underflow reports are informational, but a
                    // stream error means the device stopped delivering;
                    // flag the session as complete so the controller exits.
                    log::warn!("input stream: {err}");
                    done.store(true, Ordering::Release);
                }
            },
            None,
        )?;

        let done_out = Arc::clone(&stream_done);
        let output_stream = self.output.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if done_out.load(Ordering::Acquire) {
                    data.fill(0.0);
                    return;
                }
                if output_queue.pop(data).is_err() {
                    data.fill(0.0);
                    done_out.store(true, Ordering::Release);
                }
            },
            {
                let done = Arc::clone(&stream_done);
                move |err: cpal::StreamError| {
                    log::warn!("output stream: {err}");
                    done.store(true, Ordering::Release);
                }
            },
            None,
        )?;

        input_stream.play()?;
        output_stream.play()?;

        Ok(RealtimeStreams {
            _input: input_stream,
            _output: output_stream,
        })
    }

    // -----------------------------------------------------------------------
    // Batch (blocking) capture and playback
    // -----------------------------------------------------------------------

    /// Record exactly `num_samples` interleaved samples, blocking the
    /// calling thread until the capture is complete or the stream fails.
    ///
    /// The stream is stopped (dropped) before this returns, on success and
    /// on error alike.
    pub fn record(&self, num_samples: usize) -> Result<Vec<f32>, DeviceError> {
        let captured = Arc::new(Mutex::new(Vec::<f32>::with_capacity(num_samples)));
        let failure: FailureSlot = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&captured);
        let failed = Arc::clone(&failure);
        let stream = self.input.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buf = sink.lock().unwrap();
                if buf.len() < num_samples {
                    let room = num_samples - buf.len();
                    buf.extend_from_slice(&data[..data.len().min(room)]);
                }
            },
            move |err: cpal::StreamError| {
                log::warn!("record stream: {err}");
                failed.lock().unwrap().get_or_insert(err.to_string());
            },
            None,
        )?;
        stream.play()?;

        // The callback stops appending at num_samples; poll until it gets
        // there.  Capture duration dominates, so a coarse poll interval is
        // plenty.
        wait_for_stream(
            || captured.lock().unwrap().len() >= num_samples,
            &failure,
        )?;
        drop(stream);

        let samples = std::mem::take(&mut *captured.lock().unwrap());
        Ok(samples)
    }

    /// Play `samples` to the output device, blocking until every sample has
    /// been handed to the hardware or the stream fails.
    pub fn play(&self, samples: Vec<f32>) -> Result<(), DeviceError> {
        let total = samples.len();
        let source = Arc::new(samples);
        let position = Arc::new(Mutex::new(0usize));
        let exhausted = Arc::new(AtomicBool::new(total == 0));
        let failure: FailureSlot = Arc::new(Mutex::new(None));

        let src = Arc::clone(&source);
        let pos = Arc::clone(&position);
        let done = Arc::clone(&exhausted);
        let failed = Arc::clone(&failure);
        let stream = self.output.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut p = pos.lock().unwrap();
                let n = data.len().min(total - *p);
                data[..n].copy_from_slice(&src[*p..*p + n]);
                data[n..].fill(0.0);
                *p += n;
                if *p >= total {
                    done.store(true, Ordering::Release);
                }
            },
            move |err: cpal::StreamError| {
                log::warn!("playback stream: {err}");
                failed.lock().unwrap().get_or_insert(err.to_string());
            },
            None,
        )?;
        stream.play()?;

        wait_for_stream(|| exhausted.load(Ordering::Acquire), &failure)?;
        // Let the device drain the final block before tearing the stream down.
        std::thread::sleep(Duration::from_millis(100));
        drop(stream);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

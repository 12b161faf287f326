//! Processing worker — the thread between the two realtime queues.
//!
//! The device callbacks must stay cheap, so the actual effect chain runs
//! here, on an ordinary thread: pop a raw block from the input queue, run
//! the pitch shift and dither passes, push the result to the output queue.
//! The queues' blocking semantics give the worker its pacing; there is no
//! timer and no busy loop.

use std::sync::Arc;
use std::thread;

use crate::audio::BoundedAudioQueue;
use crate::config::PipelineConfig;
use crate::dsp::{dither_clamp, pitch_shift};

// ---------------------------------------------------------------------------
// WorkerParams
// ---------------------------------------------------------------------------

/// Everything the worker loop needs, detached from the full config so the
/// thread owns a small plain value.
#[derive(Debug, Clone, Copy)]
pub struct WorkerParams {
    /// Samples per block popped/pushed in one iteration.
    pub block_samples: usize,
    /// Stream sample rate in Hz.
    pub sample_rate: u32,
    /// Pitch shift in semitones.
    pub pitch_steps: i32,
    /// Dither noise amplitude.
    pub dither_amplitude: f32,
}

impl From<&PipelineConfig> for WorkerParams {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            block_samples: config.audio.block_samples(),
            sample_rate: config.audio.sample_rate,
            pitch_steps: config.effect.pitch_steps,
            dither_amplitude: config.effect.dither_amplitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker loop
// ---------------------------------------------------------------------------

/// Run the processing loop until either queue reports termination.
///
/// The scratch block is allocated once up front; the loop itself does not
/// allocate.  Exiting on [`crate::audio::QueueClosed`] from either side is
/// the normal shutdown path, so this function has no error return.
pub fn process_loop(
    input: &BoundedAudioQueue,
    output: &BoundedAudioQueue,
    params: WorkerParams,
) {
    log::info!("audio worker started ({} samples/block)", params.block_samples);
    let mut block = vec![0.0_f32; params.block_samples];

    loop {
        if input.pop(&mut block).is_err() {
            break;
        }
        pitch_shift(&mut block, params.sample_rate, params.pitch_steps);
        dither_clamp(&mut block, params.dither_amplitude);
        if output.push(&block).is_err() {
            break;
        }
    }

    log::info!("audio worker stopped");
}

/// Spawn the worker on a dedicated named thread.
///
/// Join the returned handle only after terminating both queues, otherwise
/// the worker may be parked in `pop`/`push` forever and the join deadlocks.
pub fn spawn_worker(
    input: Arc<BoundedAudioQueue>,
    output: Arc<BoundedAudioQueue>,
    params: WorkerParams,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("audio-worker".into())
        .spawn(move || process_loop(&input, &output, params))
        .expect("failed to spawn audio worker thread")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

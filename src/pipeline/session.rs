//! Realtime session — queue pair ownership and mode orchestration.
//!
//! A [`RealtimeSession`] owns everything the realtime mode shares between
//! threads: the input queue, the output queue, and the stream-done flag the
//! device callbacks raise when a queue reports termination.  It is an
//! explicit value handed to the callbacks and the worker at construction,
//! so nothing about the pipeline lives in globals and several sessions can
//! exist (sequentially or in tests) without interfering.
//!
//! # Shutdown protocol
//!
//! Shutdown is the delicate part.  [`run_realtime`] always performs, in
//! order: terminate **both** queues (all four wait conditions are woken, so
//! nothing stays parked), drop the streams, then join the worker.
//! Termination must come first: dropping a cpal stream joins its callback
//! thread, and at shutdown that thread is routinely blocked in `pop` on the
//! drained output queue — only the terminate broadcast sends it back to the
//! device (with silence) so the drop can complete.  The worker join stays
//! last for the same reason: it may be parked on either queue until the
//! broadcast reaches it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{AudioDevice, BoundedAudioQueue, DeviceError};
use crate::config::{AudioConfig, PipelineConfig};

use super::worker::{spawn_worker, WorkerParams};

// ---------------------------------------------------------------------------
// RealtimeSession
// ---------------------------------------------------------------------------

/// Shared state of one realtime run: two queues plus the stream-done flag.
///
/// Queues are sized for `queue_secs` of audio (2 s by default), so a device
/// callback only ever blocks when the worker has fallen that far behind.
pub struct RealtimeSession {
    /// Raw capture blocks, device callback → worker.
    pub input: Arc<BoundedAudioQueue>,
    /// Processed blocks, worker → device callback.
    pub output: Arc<BoundedAudioQueue>,
    /// Raised by a device callback once it observes queue termination;
    /// polled by the controller as the "stream complete" signal.
    pub stream_done: Arc<AtomicBool>,
}

impl RealtimeSession {
    /// Create the queue pair for `audio`'s geometry.
    ///
    /// # Panics
    ///
    /// Panics if the configured queue cannot hold even a single block —
    /// that config could never move data and is a programmer error.
    pub fn new(audio: &AudioConfig) -> Self {
        let capacity = audio.queue_capacity();
        assert!(
            capacity > audio.block_samples(),
            "queue capacity {capacity} cannot hold one {}-sample block",
            audio.block_samples()
        );
        Self {
            input: Arc::new(BoundedAudioQueue::new(capacity)),
            output: Arc::new(BoundedAudioQueue::new(capacity)),
            stream_done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Terminate both queues, waking every blocked producer and consumer.
    /// Idempotent.
    pub fn terminate(&self) {
        self.input.terminate();
        self.output.terminate();
    }

    /// True once a device callback has observed termination.
    pub fn is_stream_done(&self) -> bool {
        self.stream_done.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// run_realtime
// ---------------------------------------------------------------------------

/// Run the realtime voice changer until `stop` is raised or the stream
/// completes on its own.
///
/// Sequence: open the device, spawn the worker, start the duplex streams,
/// poll, then unwind in shutdown order (terminate → streams → join).  The
/// unwind runs on the error path too, so a failed stream start never leaks
/// the worker thread.
///
/// # Errors
///
/// Returns [`DeviceError`] when the device cannot be opened or a stream
/// fails to build/start.  Either way the session is fully torn down before
/// returning.
pub fn run_realtime(config: &PipelineConfig, stop: Arc<AtomicBool>) -> Result<(), DeviceError> {
    let device = AudioDevice::open(&config.audio)?;
    let session = RealtimeSession::new(&config.audio);

    let worker = spawn_worker(
        Arc::clone(&session.input),
        Arc::clone(&session.output),
        WorkerParams::from(config),
    );

    let streams = match device.start_realtime(
        Arc::clone(&session.input),
        Arc::clone(&session.output),
        Arc::clone(&session.stream_done),
    ) {
        Ok(streams) => streams,
        Err(e) => {
            // The worker is already parked in pop; wake it before joining.
            session.terminate();
            let _ = worker.join();
            return Err(e);
        }
    };

    log::info!(
        "realtime voice changer running ({} Hz, {} frames/block, {} semitones)",
        config.audio.sample_rate,
        config.audio.block_frames,
        config.effect.pitch_steps
    );

    while !stop.load(Ordering::Acquire) && !session.is_stream_done() {
        std::thread::sleep(Duration::from_millis(50));
    }

    // Shutdown order matters: wake everything blocked on the queues before
    // touching the streams.  Dropping a stream joins its callback thread,
    // which at this point may be parked in pop on the empty output queue;
    // without the broadcast that join would never return.
    session.terminate();
    drop(streams);
    worker.join().expect("audio worker panicked");

    log::info!("realtime voice changer stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

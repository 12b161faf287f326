//! Blocking bounded queue for `f32` audio samples.
//!
//! [`BoundedAudioQueue`] is the hand-off point between the real-time device
//! callback and the processing worker thread.  Unlike a lossy ring buffer,
//! `push` and `pop` **block** until space/data is available, so a slow
//! consumer back-pressures the producer instead of dropping audio.
//!
//! One slot is always kept empty so the two cursors alone distinguish
//! "empty" from "full": a queue created with storage `capacity` holds at
//! most `capacity - 1` samples.
//!
//! Discipline: exactly one producer thread and one consumer thread per
//! instance.  The queue serialises access internally, but the FIFO
//! guarantees in the doc comments assume the single-producer /
//! single-consumer usage the pipeline has.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use voice_changer::audio::BoundedAudioQueue;
//!
//! let q = Arc::new(BoundedAudioQueue::new(8));
//! q.push(&[1.0, 2.0, 3.0]).unwrap();
//!
//! let mut out = [0.0_f32; 3];
//! q.pop(&mut out).unwrap();
//! assert_eq!(out, [1.0, 2.0, 3.0]);
//!
//! q.terminate();
//! assert!(q.push(&[0.0]).is_err());
//! ```

use std::sync::{Condvar, Mutex};

use thiserror::Error;

// ---------------------------------------------------------------------------
// QueueClosed
// ---------------------------------------------------------------------------

/// Returned by [`BoundedAudioQueue::push`] / [`pop`](BoundedAudioQueue::pop)
/// after [`terminate`](BoundedAudioQueue::terminate) has been called.
///
/// This is the expected shutdown signal, not a failure: callers treat it as
/// "stop looping", never as an error to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("audio queue terminated")]
pub struct QueueClosed;

// ---------------------------------------------------------------------------
// Ring state (guarded by the mutex)
// ---------------------------------------------------------------------------

struct Ring {
    buf: Vec<f32>,
    /// Index of the next sample to read (wraps around `buf.len()`).
    read_pos: usize,
    /// Index of the next write position (wraps around `buf.len()`).
    write_pos: usize,
    closed: bool,
}

impl Ring {
    fn occupancy(&self) -> usize {
        let c = self.buf.len();
        (self.write_pos + c - self.read_pos) % c
    }

    fn free_space(&self) -> usize {
        // One slot stays empty to disambiguate full from empty.
        self.buf.len() - self.occupancy() - 1
    }
}

// ---------------------------------------------------------------------------
// BoundedAudioQueue
// ---------------------------------------------------------------------------

/// Fixed-capacity blocking SPSC queue of `f32` samples.
///
/// All methods take `&self`; share the queue between the producer and
/// consumer threads via `Arc`.
pub struct BoundedAudioQueue {
    ring: Mutex<Ring>,
    /// Signalled by `push` when samples arrive; waited on by `pop`.
    data_available: Condvar,
    /// Signalled by `pop` when slots free up; waited on by `push`.
    space_available: Condvar,
}

impl BoundedAudioQueue {
    /// Create a queue with `capacity` sample slots of storage.
    ///
    /// At most `capacity - 1` samples can be in flight at once.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` (a queue that can never hold a sample).
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "BoundedAudioQueue capacity must be >= 2");
        Self {
            ring: Mutex::new(Ring {
                buf: vec![0.0; capacity],
                read_pos: 0,
                write_pos: 0,
                closed: false,
            }),
            data_available: Condvar::new(),
            space_available: Condvar::new(),
        }
    }

    /// Copy `samples` into the queue, blocking until enough free slots exist.
    ///
    /// On success the samples are visible to `pop` in push order and any
    /// waiting consumer is woken.  Returns [`QueueClosed`] (writing nothing)
    /// if the queue is terminated before space becomes available.
    ///
    /// # Panics
    ///
    /// Panics if `samples.len()` exceeds the queue's usable capacity
    /// (`capacity - 1`) — such a push could never complete.
    pub fn push(&self, samples: &[f32]) -> Result<(), QueueClosed> {
        let mut ring = self.ring.lock().unwrap();
        assert!(
            samples.len() < ring.buf.len(),
            "push of {} samples can never fit a queue with capacity {}",
            samples.len(),
            ring.buf.len()
        );

        // Re-check after every wake: condvar wakeups may be spurious.
        while ring.free_space() < samples.len() && !ring.closed {
            ring = self.space_available.wait(ring).unwrap();
        }
        if ring.closed {
            return Err(QueueClosed);
        }

        let c = ring.buf.len();
        for &s in samples {
            let w = ring.write_pos;
            ring.buf[w] = s;
            ring.write_pos = (w + 1) % c;
        }

        self.data_available.notify_one();
        Ok(())
    }

    /// Fill `out` from the queue, blocking until enough samples exist.
    ///
    /// On success the read cursor advances past the copied samples and any
    /// waiting producer is woken.  Returns [`QueueClosed`] (leaving `out`
    /// unspecified) if the queue is terminated before the data arrives.
    ///
    /// # Panics
    ///
    /// Panics if `out.len()` exceeds the queue's usable capacity.
    pub fn pop(&self, out: &mut [f32]) -> Result<(), QueueClosed> {
        let mut ring = self.ring.lock().unwrap();
        assert!(
            out.len() < ring.buf.len(),
            "pop of {} samples can never fill from a queue with capacity {}",
            out.len(),
            ring.buf.len()
        );

        while ring.occupancy() < out.len() && !ring.closed {
            ring = self.data_available.wait(ring).unwrap();
        }
        if ring.closed {
            return Err(QueueClosed);
        }

        let c = ring.buf.len();
        for slot in out.iter_mut() {
            let r = ring.read_pos;
            *slot = ring.buf[r];
            ring.read_pos = (r + 1) % c;
        }

        self.space_available.notify_one();
        Ok(())
    }

    /// Close the queue: every blocked and future `push`/`pop` returns
    /// [`QueueClosed`].  Idempotent.
    ///
    /// Both wait conditions are broadcast so no thread stays parked.
    pub fn terminate(&self) {
        let mut ring = self.ring.lock().unwrap();
        ring.closed = true;
        drop(ring);
        self.data_available.notify_all();
        self.space_available.notify_all();
    }

    /// Returns `true` once [`terminate`](Self::terminate) has been called.
    pub fn is_terminated(&self) -> bool {
        self.ring.lock().unwrap().closed
    }

    /// Number of samples currently queued.
    pub fn occupancy(&self) -> usize {
        self.ring.lock().unwrap().occupancy()
    }

    /// Largest number of samples the queue can hold (`storage - 1`).
    pub fn capacity(&self) -> usize {
        self.ring.lock().unwrap().buf.len() - 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

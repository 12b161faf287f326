//! Pipeline orchestration — realtime session wiring and batch mode.
//!
//! # Realtime flow
//!
//! ```text
//! input callback ─ push ─▶ input queue ─ pop ─▶ worker
//!                                        (pitch shift + dither)
//! output callback ◀─ pop ─ output queue ◀─ push ─┘
//! ```
//!
//! The callbacks and the worker only ever meet at the two
//! [`crate::audio::BoundedAudioQueue`]s; [`session::run_realtime`] owns the
//! start/stop choreography.  [`batch::run_batch`] is the queue-free
//! sequential alternative.

pub mod batch;
pub mod session;
pub mod worker;

pub use batch::{process_recording, run_batch};
pub use session::{run_realtime, RealtimeSession};
pub use worker::{process_loop, spawn_worker, WorkerParams};

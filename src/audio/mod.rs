//! Audio I/O — blocking sample queues, cpal device/stream lifecycle, and
//! WAV export.
//!
//! # Realtime data flow
//!
//! ```text
//! Microphone → input callback → BoundedAudioQueue (in)
//!            → worker thread  → BoundedAudioQueue (out)
//!            → output callback → Speakers
//! ```
//!
//! The queues are the only synchronisation between the device callbacks and
//! the worker; see [`queue`] for the blocking/termination contract.

pub mod device;
pub mod queue;
pub mod wav;

pub use device::{AudioDevice, DeviceError, RealtimeStreams};
pub use queue::{BoundedAudioQueue, QueueClosed};
pub use wav::{write_wav, WavError};

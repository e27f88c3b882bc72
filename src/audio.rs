//! Playback engine adapter.
//!
//! [`PlaybackEngine`] is the seam the controller talks to. [`AudioPlayer`]
//! implements it on a dedicated thread that owns the rodio output and at
//! most one bound sink.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::PlaybackEngine;
pub use player::AudioPlayer;
pub use types::{EngineEvent, EngineEventKind, ErrorKind, Ticket};

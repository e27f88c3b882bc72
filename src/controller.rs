//! Playback controller: the state machine between the page and the engine.
//!
//! All state changes go through [`Controller`]. User intents (`toggle_play_pause`,
//! `select_next`, `seek_to`, ...) and engine events (`handle_event`) are the
//! only inputs; a [`Snapshot`] is re-published after each of them.
//!
//! Engine operations can't be cancelled, so every bind gets a new generation
//! and events carrying an older one are dropped on arrival.

mod machine;
mod state;

pub use machine::Controller;
pub use state::{PlaybackState, Snapshot, SnapshotHandle};

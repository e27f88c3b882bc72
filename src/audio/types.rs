//! Audio-related small types.
//!
//! Commands flow from the controller to the audio thread as [`AudioCmd`];
//! results flow back as [`EngineEvent`]s, each tagged with the [`Ticket`]
//! of the bind it belongs to.

use std::time::Duration;

use thiserror::Error;

use crate::catalog::Track;

/// Identifies one bind of one track. Generations only ever increase, so an
/// event whose generation differs from the current one is stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    /// Catalog index the bind was issued for.
    pub index: usize,
}

/// Failures the engine reports. Neither is fatal; the user can retry or skip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The file could not be opened or decoded.
    #[error("Couldn't load this song. Press space to retry or skip it.")]
    LoadFailed,
    /// The output refused to start.
    #[error("Playback failed. Press space to retry.")]
    PlaybackFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// Metadata resolved; the bind is ready to play. Zero means unknown.
    DurationKnown(Duration),
    PlaybackStarted,
    Progress(Duration),
    /// The bound resource played to its end. Sent at most once per bind.
    Ended,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    pub ticket: Ticket,
    pub kind: EngineEventKind,
}

impl EngineEvent {
    pub fn new(ticket: Ticket, kind: EngineEventKind) -> Self {
        Self { ticket, kind }
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Release whatever is bound, then open `track` paused at zero.
    Bind { ticket: Ticket, track: Track },
    /// Start or resume the bound track.
    Play(Ticket),
    /// Pause; harmless when nothing plays.
    Pause,
    /// Reposition the bound track.
    Seek { ticket: Ticket, to: Duration },
    /// Stop and drop the bound track.
    Release,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

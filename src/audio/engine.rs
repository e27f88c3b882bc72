use std::time::Duration;

use crate::catalog::Track;

use super::types::Ticket;

/// The controller's view of a playback backend.
///
/// Every call returns immediately. Outcomes arrive later as
/// [`EngineEvent`](super::EngineEvent)s carrying the ticket the call was made with.
pub trait PlaybackEngine {
    /// Release the current resource, then start loading `track`.
    /// Answers with `DurationKnown` or `Failed(LoadFailed)`.
    fn bind(&mut self, ticket: Ticket, track: &Track);

    /// Answers with `PlaybackStarted` or `Failed(PlaybackFailed)`.
    fn play(&mut self, ticket: Ticket);

    /// Never fails from the caller's point of view.
    fn pause(&mut self);

    /// `to` is clamped into the bound track's length by the engine.
    fn seek(&mut self, ticket: Ticket, to: Duration);

    /// Stop and drop the bound resource, if any.
    fn release(&mut self);
}

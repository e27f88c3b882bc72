use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::audio::ErrorKind;
use crate::catalog::Track;

/// Where the controller is in the load/play cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing bound yet.
    #[default]
    Idle,
    /// A bind is resolving.
    Loading,
    /// Loaded; a play request is in flight.
    Starting,
    /// Settled. `is_playing` says whether it plays or is paused.
    Ready,
}

/// State owned and mutated only by the controller.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub current_index: usize,
    pub phase: Phase,
    pub is_playing: bool,
    pub elapsed: Duration,
    /// Zero until the engine reports one.
    pub duration: Duration,
    pub last_error: Option<ErrorKind>,

    pub(super) generation: u64,
    /// The current bind resolved and hasn't failed since.
    pub(super) loaded: bool,
    pub(super) resume_on_load: bool,
    pub(super) pending_since: Option<Instant>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            phase: Phase::Idle,
            is_playing: false,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            last_error: None,
            generation: 0,
            loaded: false,
            resume_on_load: false,
            pending_since: None,
        }
    }
}

impl PlaybackState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Starting)
    }

    /// Clamp a reported position into `[0, duration]`. With an unknown
    /// duration the position is taken as reported.
    pub(super) fn clamp_elapsed(&self, t: Duration) -> Duration {
        if self.duration.is_zero() {
            t
        } else {
            t.min(self.duration)
        }
    }
}

/// Read-only view handed to presentation after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub current_index: usize,
    pub current_track: Track,
    pub track_count: usize,
    pub is_playing: bool,
    pub is_loading: bool,
    pub elapsed: Duration,
    pub duration: Duration,
    pub last_error: Option<ErrorKind>,
}

impl Snapshot {
    /// Progress through the track in `[0, 1]`; zero when the length is unknown.
    pub fn ratio(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }
}

pub type SnapshotHandle = Arc<Mutex<Snapshot>>;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{EngineEvent, EngineEventKind, ErrorKind, PlaybackEngine, Ticket};
use crate::catalog::Catalog;

use super::state::{Phase, PlaybackState, Snapshot, SnapshotHandle};

/// Owns the playback state and the engine, and is the only thing that
/// mutates either. User intents and engine events both enter here.
pub struct Controller<E: PlaybackEngine> {
    catalog: Catalog,
    engine: E,
    state: PlaybackState,
    snapshot: SnapshotHandle,
    load_timeout: Option<Duration>,
}

impl<E: PlaybackEngine> Controller<E> {
    /// `load_timeout` of `None` waits for the engine forever.
    pub fn new(catalog: Catalog, engine: E, load_timeout: Option<Duration>) -> Self {
        let state = PlaybackState::default();
        let snapshot = Arc::new(Mutex::new(build_snapshot(&catalog, &state)));
        Self {
            catalog,
            engine,
            state,
            snapshot,
            load_timeout,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Shared handle that always holds the latest snapshot.
    pub fn snapshot_handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        build_snapshot(&self.catalog, &self.state)
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.state.generation,
            index: self.state.current_index,
        }
    }

    fn publish(&self) {
        if let Ok(mut s) = self.snapshot.lock() {
            *s = build_snapshot(&self.catalog, &self.state);
        }
    }

    /// Bind the first track. Does nothing once anything has been bound.
    pub fn mount(&mut self) {
        if self.state.phase == Phase::Idle {
            self.bind(self.state.current_index, false);
            self.publish();
        }
    }

    /// Supersede whatever is in flight and start loading `index`.
    fn bind(&mut self, index: usize, resume: bool) {
        let state = &mut self.state;
        state.generation += 1;
        state.current_index = index;
        state.phase = Phase::Loading;
        state.last_error = None;
        state.elapsed = Duration::ZERO;
        state.duration = Duration::ZERO;
        state.loaded = false;
        state.resume_on_load = resume;
        state.pending_since = Some(Instant::now());

        let ticket = self.ticket();
        let track = self.catalog.track(index);
        info!(index, generation = ticket.generation, title = %track.title, resume, "switching track");
        self.engine.bind(ticket, track);
    }

    /// Switch to `index`, wrapped into the catalog. Keeps the play intent:
    /// if music was playing, or a load was going to start it, the new track
    /// starts once loaded.
    pub fn select_track(&mut self, index: isize) {
        let index = self.catalog.wrap(index);
        let resume = self.state.is_playing
            || self.state.resume_on_load
            || self.state.phase == Phase::Starting;
        self.bind(index, resume);
        self.publish();
    }

    pub fn select_next(&mut self) {
        self.select_track(self.state.current_index as isize + 1);
    }

    pub fn select_previous(&mut self) {
        self.select_track(self.state.current_index as isize - 1);
    }

    /// Pause when playing, otherwise ask the engine to play. Ignored while a
    /// load or play request is in flight. With nothing loaded (never bound, or
    /// the load failed) the current track is bound again and played once ready.
    pub fn toggle_play_pause(&mut self) {
        if self.state.is_loading() {
            debug!(phase = ?self.state.phase, "toggle ignored while loading");
            return;
        }

        if !self.state.loaded {
            self.bind(self.state.current_index, true);
        } else if self.state.is_playing {
            self.engine.pause();
            self.state.is_playing = false;
        } else {
            let ticket = self.ticket();
            self.engine.play(ticket);
            self.state.phase = Phase::Starting;
            self.state.pending_since = Some(Instant::now());
        }
        self.publish();
    }

    /// Jump to `seconds`, clamped into the track. Ignored for non-finite
    /// targets and while the length is unknown.
    pub fn seek_to(&mut self, seconds: f64) {
        if !seconds.is_finite() || self.state.duration.is_zero() {
            debug!(seconds, "seek ignored");
            return;
        }
        let to = if seconds <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(seconds.min(self.state.duration.as_secs_f64()))
                .min(self.state.duration)
        };

        let ticket = self.ticket();
        self.engine.seek(ticket, to);
        // Shown right away; the next progress report confirms it.
        self.state.elapsed = to;
        self.publish();
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek_to(self.state.elapsed.as_secs_f64() + delta_seconds);
    }

    /// Apply one engine event. Returns `false` when the event belongs to a
    /// superseded bind and was dropped.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        if event.ticket.generation != self.state.generation {
            debug!(
                stale = event.ticket.generation,
                current = self.state.generation,
                kind = ?event.kind,
                "dropping stale engine event"
            );
            return false;
        }

        match event.kind {
            EngineEventKind::DurationKnown(d) => {
                self.state.duration = d;
                self.state.elapsed = self.state.clamp_elapsed(self.state.elapsed);
                if self.state.phase == Phase::Loading {
                    self.state.loaded = true;
                    if self.state.resume_on_load {
                        self.engine.play(event.ticket);
                        self.state.phase = Phase::Starting;
                    } else {
                        self.state.phase = Phase::Ready;
                        self.state.pending_since = None;
                    }
                }
            }
            EngineEventKind::PlaybackStarted => {
                self.state.is_playing = true;
                self.state.phase = Phase::Ready;
                self.state.last_error = None;
                self.state.resume_on_load = false;
                self.state.pending_since = None;
            }
            EngineEventKind::Failed(kind) => self.fail(kind),
            EngineEventKind::Progress(t) => {
                self.state.elapsed = self.state.clamp_elapsed(t);
            }
            EngineEventKind::Ended => {
                self.state.is_playing = true;
                let next = self.catalog.wrap(self.state.current_index as isize + 1);
                self.bind(next, true);
            }
        }
        self.publish();
        true
    }

    fn fail(&mut self, kind: ErrorKind) {
        warn!(index = self.state.current_index, error = ?kind, "playback error");
        let state = &mut self.state;
        state.is_playing = false;
        state.phase = Phase::Ready;
        state.last_error = Some(kind);
        state.resume_on_load = false;
        state.pending_since = None;
        if kind == ErrorKind::LoadFailed {
            state.loaded = false;
            state.elapsed = Duration::ZERO;
            state.duration = Duration::ZERO;
        }
    }

    /// Give up on a load or play request that has been in flight longer than
    /// the configured timeout. The bind is abandoned, so anything the engine
    /// still sends for it is dropped. Returns `true` when it fired.
    pub fn check_load_timeout(&mut self, now: Instant) -> bool {
        let (Some(timeout), Some(since)) = (self.load_timeout, self.state.pending_since) else {
            return false;
        };
        if !self.state.is_loading() || now.saturating_duration_since(since) < timeout {
            return false;
        }

        let kind = if self.state.phase == Phase::Loading {
            ErrorKind::LoadFailed
        } else {
            ErrorKind::PlaybackFailed
        };
        warn!(?timeout, index = self.state.current_index, "engine did not answer in time");

        self.state.generation += 1;
        self.engine.release();
        self.fail(kind);
        // Released either way; a retry has to bind again.
        self.state.loaded = false;
        self.publish();
        true
    }
}

fn build_snapshot(catalog: &Catalog, state: &PlaybackState) -> Snapshot {
    Snapshot {
        current_index: state.current_index,
        current_track: catalog.track(state.current_index).clone(),
        track_count: catalog.len(),
        is_playing: state.is_playing,
        is_loading: state.is_loading(),
        elapsed: state.elapsed,
        duration: state.duration,
        last_error: state.last_error,
    }
}

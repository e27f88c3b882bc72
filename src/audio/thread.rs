use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::mixer::Mixer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::catalog::Track;

use super::sink::create_sink_at;
use super::types::{AudioCmd, EngineEvent, EngineEventKind, ErrorKind, Ticket};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Output {
    DefaultDevice,
    /// No device at all; every bind fails with `LoadFailed`.
    #[cfg_attr(not(test), allow(dead_code))]
    None,
}

/// Clamp a seek target into `[0, duration]`. An unknown (zero) duration
/// leaves the target alone.
pub(super) fn clamp_seek(to: Duration, duration: Duration) -> Duration {
    if duration.is_zero() { to } else { to.min(duration) }
}

/// Length to report for a freshly bound track: the decoder's, else the tag
/// hint, else zero (unknown).
pub(super) fn resolve_duration(decoded: Option<Duration>, hint: Option<Duration>) -> Duration {
    decoded.or(hint).unwrap_or_default()
}

/// The single bound resource and what the thread knows about it.
pub(super) struct Deck {
    events: Sender<EngineEvent>,
    /// `None` when there is no output device.
    mixer: Option<Mixer>,
    ticket: Option<Ticket>,
    track: Option<Track>,
    sink: Option<Sink>,
    duration: Duration,
    /// Where the current sink started in the file. Non-zero only after a
    /// seek had to reopen the file.
    offset: Duration,
    playing: bool,
    ended: bool,
}

impl Deck {
    pub(super) fn new(events: Sender<EngineEvent>, mixer: Option<Mixer>) -> Self {
        Self {
            events,
            mixer,
            ticket: None,
            track: None,
            sink: None,
            duration: Duration::ZERO,
            offset: Duration::ZERO,
            playing: false,
            ended: false,
        }
    }

    fn emit(&self, ticket: Ticket, kind: EngineEventKind) {
        // The controller may already be gone during shutdown.
        let _ = self.events.send(EngineEvent::new(ticket, kind));
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.ticket == Some(ticket)
    }

    /// Position in the file, if anything is bound.
    pub(super) fn position(&self) -> Option<Duration> {
        self.sink.as_ref().map(|s| self.offset + s.get_pos())
    }

    pub(super) fn release(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.ticket = None;
        self.track = None;
        self.duration = Duration::ZERO;
        self.offset = Duration::ZERO;
        self.playing = false;
        self.ended = false;
    }

    pub(super) fn bind(&mut self, ticket: Ticket, track: Track) {
        // Release first so two resources are never alive at once.
        self.release();
        self.ticket = Some(ticket);

        let Some(mixer) = &self.mixer else {
            warn!(track = %track.title, "no audio output, cannot load");
            self.emit(ticket, EngineEventKind::Failed(ErrorKind::LoadFailed));
            return;
        };

        match create_sink_at(mixer, &track.source, Duration::ZERO) {
            Ok(opened) => {
                self.duration = resolve_duration(opened.total_duration, track.duration_hint);
                self.sink = Some(opened.sink);
                debug!(generation = ticket.generation, track = %track.title, duration = ?self.duration, "bound");
                self.track = Some(track);
                self.emit(ticket, EngineEventKind::DurationKnown(self.duration));
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.emit(ticket, EngineEventKind::Failed(ErrorKind::LoadFailed));
            }
        }
    }

    pub(super) fn play(&mut self, ticket: Ticket) {
        let sink = match &self.sink {
            Some(s) if self.is_current(ticket) => s,
            _ => {
                debug!(generation = ticket.generation, "play for a ticket that isn't bound");
                self.emit(ticket, EngineEventKind::Failed(ErrorKind::PlaybackFailed));
                return;
            }
        };
        sink.play();
        self.playing = true;
        self.emit(ticket, EngineEventKind::PlaybackStarted);
    }

    pub(super) fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
        self.playing = false;
    }

    pub(super) fn seek(&mut self, ticket: Ticket, to: Duration) {
        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "dropping seek for a stale ticket");
            return;
        }
        let to = clamp_seek(to, self.duration);
        let Some(sink) = &self.sink else {
            return;
        };

        match sink.try_seek(to) {
            Ok(()) => {
                self.offset = Duration::ZERO;
                self.ended = false;
            }
            Err(e) => {
                debug!(error = %e, "source can't seek, reopening");
                self.reopen_at(to);
            }
        }
    }

    /// Replace the sink with a new one that skips `to` into the file.
    pub(super) fn reopen_at(&mut self, to: Duration) {
        let (Some(mixer), Some(track)) = (&self.mixer, &self.track) else {
            return;
        };
        match create_sink_at(mixer, &track.source, to) {
            Ok(opened) => {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                if self.playing {
                    opened.sink.play();
                }
                self.sink = Some(opened.sink);
                self.offset = to;
                self.ended = false;
            }
            Err(e) => warn!(error = %e, "seek by reopening failed"),
        }
    }

    /// Periodic work: report progress, detect the end of the track.
    pub(super) fn tick(&mut self) {
        let (Some(ticket), Some(sink)) = (self.ticket, &self.sink) else {
            return;
        };
        if !self.playing || self.ended {
            return;
        }
        if sink.empty() {
            self.ended = true;
            self.playing = false;
            self.emit(ticket, EngineEventKind::Progress(self.duration));
            self.emit(ticket, EngineEventKind::Ended);
        } else {
            self.emit(ticket, EngineEventKind::Progress(self.position().unwrap_or_default()));
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = &self.sink else {
            return;
        };
        if fade_out_ms == 0 || !self.playing {
            sink.set_volume(0.0);
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(1.0 - t);
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.set_volume(0.0);
    }
}

fn open_output(output: Output) -> Option<OutputStream> {
    if output == Output::None {
        return None;
    }
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the terminal UI.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            warn!(error = %e, "no audio output device");
            None
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<EngineEvent>,
    progress_interval: Duration,
    output: Output,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The stream has to outlive the deck; dropping it silences the output.
        let stream = open_output(output);
        let mut deck = Deck::new(events, stream.as_ref().map(|s| s.mixer().clone()));
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(progress_interval) {
                Ok(cmd) => match cmd {
                    AudioCmd::Bind { ticket, track } => deck.bind(ticket, track),
                    AudioCmd::Play(ticket) => deck.play(ticket),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Seek { ticket, to } => deck.seek(ticket, to),
                    AudioCmd::Release => deck.release(),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.fade_out(fade_out_ms);
                        deck.release();
                        info!("audio thread stopped");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // A steady command stream must not starve progress reports.
            if last_tick.elapsed() >= progress_interval {
                deck.tick();
                last_tick = Instant::now();
            }
        }
    })
}

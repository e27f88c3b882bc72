use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::catalog::Track;
use crate::config::AudioSettings;

use super::engine::PlaybackEngine;
use super::thread::{Output, spawn_audio_thread};
use super::types::{AudioCmd, EngineEvent, Ticket};

/// Handle to the rodio audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread on the default output device. Engine events
    /// are delivered on the returned receiver.
    pub fn new(audio_settings: &AudioSettings) -> (Self, Receiver<EngineEvent>) {
        Self::spawn(audio_settings, Output::DefaultDevice)
    }

    /// Same as [`AudioPlayer::new`] but without touching any audio device.
    #[cfg(test)]
    pub fn silent(audio_settings: &AudioSettings) -> (Self, Receiver<EngineEvent>) {
        Self::spawn(audio_settings, Output::None)
    }

    fn spawn(audio_settings: &AudioSettings, output: Output) -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<EngineEvent>();

        let handle = spawn_audio_thread(
            rx,
            events_tx,
            Duration::from_millis(audio_settings.progress_interval_ms.max(1)),
            output,
        );

        let player = Self {
            tx,
            join: Mutex::new(Some(handle)),
        };
        (player, events_rx)
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone");
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackEngine for AudioPlayer {
    fn bind(&mut self, ticket: Ticket, track: &Track) {
        self.send(AudioCmd::Bind {
            ticket,
            track: track.clone(),
        });
    }

    fn play(&mut self, ticket: Ticket) {
        self.send(AudioCmd::Play(ticket));
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, ticket: Ticket, to: Duration) {
        self.send(AudioCmd::Seek { ticket, to });
    }

    fn release(&mut self) {
        self.send(AudioCmd::Release);
    }
}

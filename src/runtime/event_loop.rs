use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{AudioPlayer, EngineEvent, PlaybackEngine};
use crate::config;
use crate::controller::Controller;
use crate::ui;

/// What a key press asks the controller to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    TogglePlayPause,
    Next,
    Previous,
    ScrubForward,
    ScrubBackward,
    /// Jump to tenths of the track: `0` is the start, `9` is 90%.
    SeekTenths(u8),
    Quit,
}

/// Main terminal event loop: feeds engine events and key presses into the
/// controller and draws the latest snapshot. Returns `Ok(())` on quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<AudioPlayer>,
    engine_events: &Receiver<EngineEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = controller.snapshot_handle();

    loop {
        while let Ok(ev) = engine_events.try_recv() {
            controller.handle_event(ev);
        }
        controller.check_load_timeout(Instant::now());

        let view = match snapshot.lock() {
            Ok(s) => s.clone(),
            Err(_) => controller.snapshot(),
        };
        terminal.draw(|f| ui::draw(f, &view, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(intent) = intent_for(key) {
                    if apply(intent, controller, &settings.controls) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

pub fn intent_for(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Intent::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Intent::TogglePlayPause),
        KeyCode::Char('l') | KeyCode::Right => Some(Intent::Next),
        KeyCode::Char('h') | KeyCode::Left => Some(Intent::Previous),
        KeyCode::Char('L') => Some(Intent::ScrubForward),
        KeyCode::Char('H') => Some(Intent::ScrubBackward),
        KeyCode::Char(c @ '0'..='9') => Some(Intent::SeekTenths(c as u8 - b'0')),
        _ => None,
    }
}

/// Hand an intent to the controller. Returns `true` when the app should quit.
pub fn apply<E: PlaybackEngine>(
    intent: Intent,
    controller: &mut Controller<E>,
    controls: &config::ControlsSettings,
) -> bool {
    let scrub = controls.scrub_seconds as f64;
    match intent {
        Intent::TogglePlayPause => controller.toggle_play_pause(),
        Intent::Next => controller.select_next(),
        Intent::Previous => controller.select_previous(),
        Intent::ScrubForward => controller.seek_by(scrub),
        Intent::ScrubBackward => controller.seek_by(-scrub),
        Intent::SeekTenths(n) => {
            let total = controller.state().duration.as_secs_f64();
            controller.seek_to(total * f64::from(n) / 10.0);
        }
        Intent::Quit => return true,
    }
    false
}

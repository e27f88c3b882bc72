use std::path::PathBuf;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::audio::ErrorKind;
use crate::catalog::Track;

fn snapshot() -> Snapshot {
    Snapshot {
        current_index: 1,
        current_track: Track {
            id: 2,
            title: "Ashiyan".into(),
            source: PathBuf::from("/music/music2.mp3"),
            cover: Some(PathBuf::from("/images/ashiyan.jpg")),
            duration_hint: None,
        },
        track_count: 3,
        is_playing: false,
        is_loading: false,
        elapsed: Duration::from_secs(65),
        duration: Duration::from_secs(200),
        last_error: None,
    }
}

fn render(snapshot: &Snapshot) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
    terminal
        .draw(|f| {
            draw(
                f,
                snapshot,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn format_time_is_minutes_and_padded_seconds() {
    assert_eq!(format_time(Duration::ZERO), "0:00");
    assert_eq!(format_time(Duration::from_millis(65_900)), "1:05");
    assert_eq!(format_time(Duration::from_secs(600)), "10:00");
}

#[test]
fn status_label_prefers_loading() {
    let mut s = snapshot();
    assert_eq!(status_label(&s), "Paused");
    s.is_playing = true;
    assert_eq!(status_label(&s), "Now Playing ♪");
    s.is_loading = true;
    assert_eq!(status_label(&s), "Loading...");
}

#[test]
fn controls_text_includes_scrub_seconds() {
    assert!(controls_text(7).contains("[H/L] scrub -/+7s"));
}

#[test]
fn page_shows_track_position_and_times() {
    let screen = render(&snapshot());
    assert!(screen.contains("A Few Songs For You"));
    assert!(screen.contains("Ashiyan"));
    assert!(screen.contains("Cover: ashiyan.jpg"));
    assert!(screen.contains("Track 2 / 3"));
    assert!(screen.contains("1:05 / 3:20"));
    assert!(screen.contains("Paused"));
}

#[test]
fn page_shows_error_message() {
    let mut s = snapshot();
    s.last_error = Some(ErrorKind::PlaybackFailed);
    s.elapsed = Duration::ZERO;
    s.duration = Duration::ZERO;
    let screen = render(&s);
    assert!(screen.contains("Playback failed."));
    assert!(screen.contains("0:00 / 0:00"));
}

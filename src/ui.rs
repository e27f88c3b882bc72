//! UI rendering helpers for the terminal user interface.
//!
//! Everything drawn here comes from a controller [`Snapshot`]; the page never
//! reads playback state anywhere else.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::config::{ControlsSettings, UiSettings};
use crate::controller::Snapshot;

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{scrub_seconds}s"),
        "[0-9] jump to 0-90%".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `m:ss`. Zero reads `0:00`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// The one-word state of the current track.
pub fn status_label(snapshot: &Snapshot) -> &'static str {
    if snapshot.is_loading {
        "Loading..."
    } else if snapshot.is_playing {
        "Now Playing ♪"
    } else {
        "Paused"
    }
}

fn cover_text(snapshot: &Snapshot) -> String {
    let name = snapshot
        .current_track
        .cover
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());
    match name {
        Some(n) => format!("Cover: {n}"),
        None => "Cover: -".to_string(),
    }
}

/// Render the whole page into `frame` from `snapshot` and settings.
pub fn draw(
    frame: &mut Frame,
    snapshot: &Snapshot,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = [
        format!(" {}", status_label(snapshot)),
        format!(
            "Track {} / {}",
            snapshot.current_index + 1,
            snapshot.track_count
        ),
    ]
    .join(" • ");
    let status_par = Paragraph::new(status).block(Block::bordered().title(" status "));
    frame.render_widget(status_par, chunks[1]);

    // Now playing card
    let mut lines = Vec::new();
    if ui_settings.show_cover {
        lines.push(Line::from(cover_text(snapshot)).dim());
    }
    lines.push(Line::from(Span::styled(
        snapshot.current_track.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(err) = snapshot.last_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 1,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(card, chunks[2]);

    // Progress
    let progress = Gauge::default()
        .block(Block::bordered())
        .gauge_style(Style::default().add_modifier(Modifier::REVERSED))
        .ratio(snapshot.ratio())
        .label(format!(
            "{} / {}",
            format_time(snapshot.elapsed),
            format_time(snapshot.duration)
        ));
    frame.render_widget(progress, chunks[3]);

    let footer_text = controls_text(controls_settings.scrub_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests;

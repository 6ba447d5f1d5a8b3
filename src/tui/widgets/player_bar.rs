//! Bottom player bar: now playing, progress, transport controls.

use crate::app::state::AppState;
use crate::tui::theme::PALETTE;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PALETTE.border))
        .title(" Player ")
        .title_style(Style::default().fg(PALETTE.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
        ])
        .split(inner);

    let width = inner.width as usize;

    let title = state.playback.title().unwrap_or("Not playing");
    let title_line = Line::from(Span::styled(
        truncate_str(title, width),
        Style::default()
            .fg(PALETTE.fg_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    let ratio = if state.duration_secs > 0.0 {
        (state.position_secs / state.duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let bar = progress_bar(rows[1].width as usize, ratio);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            bar,
            Style::default().fg(PALETTE.accent),
        ))),
        rows[1],
    );

    let pos = format_time(state.position_secs);
    let dur = format_time(state.duration_secs);
    let play_icon = if state.paused { "|>" } else { "||" };

    let mut spans = vec![Span::styled(
        format!("{pos}/{dur}  {play_icon}"),
        Style::default().fg(PALETTE.fg_secondary),
    )];

    // Next/previous only make sense while a playlist item is active.
    if state.playback.controls_visible() {
        let index = state.playback.playlist_index().unwrap_or(0);
        let total = state
            .navigator
            .cache()
            .meta()
            .map(|m| m.total)
            .unwrap_or(0);
        spans.push(Span::styled(
            format!("  p:prev n:next  {}/{}", index + 1, total),
            Style::default().fg(PALETTE.playing),
        ));
    }

    spans.push(Span::styled(
        format!("  vol {}%", state.volume),
        Style::default().fg(PALETTE.fg_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), rows[2]);
}

fn progress_bar(width: usize, ratio: f64) -> String {
    if width < 3 {
        return String::new();
    }
    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);
    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push('\u{2501}');
    }
    bar.push('\u{25cf}');
    for _ in 0..empty {
        bar.push('\u{2500}');
    }
    bar
}

fn format_time(seconds: f64) -> String {
    let m = (seconds / 60.0).floor() as u32;
    let s = (seconds % 60.0).floor() as u32;
    format!("{m:02}:{s:02}")
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

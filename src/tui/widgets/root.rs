//! Top-level layout: tab row, active panel, status line, player bar.

use crate::app::state::{AppState, Focus, Panel};
use crate::tui::theme::PALETTE;
use crate::tui::widgets::{cards, help, player_bar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PANELS: [Panel; 4] = [Panel::Search, Panel::Video, Panel::Playlist, Panel::Help];

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Panel body
            Constraint::Length(1), // Status line
            Constraint::Length(5), // Player bar
        ])
        .split(frame.area());

    render_tabs(frame, state, rows[0]);

    match state.panel {
        Panel::Search => render_search(frame, state, rows[1]),
        Panel::Video => render_video(frame, state, rows[1]),
        Panel::Playlist => render_playlist(frame, state, rows[1]),
        Panel::Help => help::render(frame, rows[1]),
    }

    let status = Paragraph::new(Line::from(state.status.as_str()))
        .style(Style::default().fg(PALETTE.fg_secondary));
    frame.render_widget(status, rows[2]);

    player_bar::render(frame, state, rows[3]);
}

fn render_tabs(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = Vec::new();
    for (i, panel) in PANELS.iter().enumerate() {
        let style = if *panel == state.panel {
            Style::default()
                .fg(PALETTE.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(PALETTE.fg_secondary)
        };
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, panel.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let rows = split_input_body(area);
    render_input_box(
        frame,
        " Query ",
        &state.search_query,
        state.search_focus == Focus::Input,
        rows[0],
    );
    cards::render_search_results(frame, state, rows[1]);
}

fn render_video(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let rows = split_input_body(area);
    render_input_box(frame, " Video URL or id ", &state.video_input, true, rows[0]);
    let hint = Paragraph::new(Line::from(
        "Enter plays through the proxy. Accepts watch/shorts/youtu.be URLs or a bare 11-char id.",
    ))
    .style(Style::default().fg(PALETTE.fg_secondary));
    frame.render_widget(hint, rows[1]);
}

fn render_playlist(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let rows = split_input_body(area);
    render_input_box(
        frame,
        " Playlist URL ",
        &state.playlist_input,
        state.playlist_focus == Focus::Input,
        rows[0],
    );
    cards::render_playlist_page(frame, state, rows[1]);
}

fn split_input_body(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area)
}

fn render_input_box(frame: &mut Frame, title: &str, value: &str, focused: bool, area: Rect) {
    let border_color = if focused {
        PALETTE.accent
    } else {
        PALETTE.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_style(Style::default().fg(PALETTE.accent));

    let cursor = if focused { "\u{258f}" } else { "" };
    let p = Paragraph::new(Line::from(format!("{value}{cursor}")))
        .style(Style::default().fg(PALETTE.fg_primary))
        .block(block);
    frame.render_widget(p, area);
}

use crate::tui::theme::PALETTE;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "Cycle panels"),
    ("1 / 2 / 3 / 4", "Search, Video URL, Playlist, Help"),
    ("/ or i", "Focus the text box"),
    ("j / k, arrows", "Move card selection"),
    ("g / G", "First / last card"),
    ("Enter", "Play selected card (or submit text)"),
    ("h / l", "Previous / next playlist page"),
    ("n / p", "Next / previous playlist item"),
    ("Space", "Pause / resume"),
    ("[ / ]", "Seek back / forward 10s"),
    ("- / =", "Volume down / up"),
    ("Ctrl-r / F5", "Refresh"),
    ("q", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let mut lines = Vec::with_capacity(BINDINGS.len());
    for (keys, what) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{keys:>18}  "),
                Style::default()
                    .fg(PALETTE.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*what, Style::default().fg(PALETTE.fg_primary)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

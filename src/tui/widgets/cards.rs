//! Card lists for search results and playlist pages.

use crate::api::models::VideoItem;
use crate::app::state::{AppState, CardListState};
use crate::tui::theme::PALETTE;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render_search_results(frame: &mut Frame, state: &mut AppState, area: Rect) {
    if state.search_loading {
        let loading = Paragraph::new(Line::from("Searching..."))
            .style(Style::default().fg(PALETTE.fg_secondary));
        frame.render_widget(loading, area);
        return;
    }
    if state.search_items.is_empty() {
        let empty = Paragraph::new(Line::from("Search for videos above"))
            .style(Style::default().fg(PALETTE.fg_secondary));
        frame.render_widget(empty, area);
        return;
    }

    state.search_list.update_scroll(area.height as usize);
    let items: Vec<&VideoItem> = state.search_items.iter().collect();
    render_card_list(frame, &items, &state.search_list, None, area);
}

pub fn render_playlist_page(frame: &mut Frame, state: &mut AppState, area: Rect) {
    if let Some(msg) = &state.playlist_status {
        let err = Paragraph::new(Line::from(msg.as_str()))
            .style(Style::default().fg(PALETTE.error));
        frame.render_widget(err, area);
        return;
    }
    if state.navigator.is_loading() && state.navigator.cache().meta().is_none() {
        let loading = Paragraph::new(Line::from("Loading playlist..."))
            .style(Style::default().fg(PALETTE.fg_secondary));
        frame.render_widget(loading, area);
        return;
    }
    let Some(meta) = state.navigator.cache().meta() else {
        let empty = Paragraph::new(Line::from("Paste a playlist URL above"))
            .style(Style::default().fg(PALETTE.fg_secondary));
        frame.render_widget(empty, area);
        return;
    };

    // Pager line only when there is more than one page.
    let pager_height = if meta.total_pages > 1 { 1 } else { 0 };
    let list_area = Rect {
        height: area.height.saturating_sub(pager_height),
        ..area
    };

    if pager_height > 0 {
        let pager = format!(
            "Page {} / {}  (h/l to flip, {} items)",
            meta.page, meta.total_pages, meta.total
        );
        frame.render_widget(
            Paragraph::new(Line::from(pager)).style(Style::default().fg(PALETTE.fg_secondary)),
            Rect::new(area.x, area.y + list_area.height, area.width, 1),
        );
    }

    // The active highlight is recomputed from the navigator on every
    // render; it is never cached on the cards themselves.
    let active_offset = state.navigator.active_offset();

    state.playlist_list.update_scroll(list_area.height as usize);
    let items: Vec<&VideoItem> = state.navigator.cache().items().iter().collect();
    render_card_list(frame, &items, &state.playlist_list, active_offset, list_area);
}

fn render_card_list(
    frame: &mut Frame,
    items: &[&VideoItem],
    list: &CardListState,
    active_offset: Option<usize>,
    area: Rect,
) {
    let visible_height = area.height as usize;

    let rendered: Vec<ListItem> = items
        .iter()
        .enumerate()
        .skip(list.scroll_offset)
        .take(visible_height)
        .map(|(offset, item)| {
            let is_active = active_offset == Some(offset);
            let marker = if is_active { "\u{25b6} " } else { "  " };

            let title_style = if is_active {
                Style::default()
                    .fg(PALETTE.playing)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(PALETTE.fg_primary)
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(PALETTE.playing)),
                Span::styled(item.title.as_str(), title_style),
            ];
            if let Some(channel) = &item.channel {
                spans.push(Span::styled(
                    format!("  {channel}"),
                    Style::default().fg(PALETTE.fg_secondary),
                ));
            }
            if let Some(duration) = &item.duration {
                spans.push(Span::styled(
                    format!("  [{duration}]"),
                    Style::default().fg(PALETTE.fg_secondary),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let adjusted_selected = list.selected.saturating_sub(list.scroll_offset);
    let mut list_state = ListState::default();
    list_state.select(Some(adjusted_selected));

    let widget = List::new(rendered)
        .highlight_style(
            Style::default()
                .fg(PALETTE.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(widget, area, &mut list_state);

    // Scroll position in the top-right corner.
    if items.len() > visible_height {
        let pos_text = format!("{}/{}", list.selected + 1, items.len());
        let pos_len = pos_text.len() as u16;
        let pos_x = area.x + area.width.saturating_sub(pos_len);
        if pos_x > area.x {
            frame.render_widget(
                Paragraph::new(pos_text).style(Style::default().fg(PALETTE.fg_secondary)),
                Rect::new(pos_x, area.y, pos_len, 1),
            );
        }
    }
}

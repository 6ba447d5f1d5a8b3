use crate::api::models::VideoItem;
use crate::player::state::Playback;
use crate::playlist::Navigator;

/// Top-level panels, mirroring the proxy frontend's tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Search,
    Video,
    Playlist,
    Help,
}

impl Panel {
    pub fn next(self) -> Self {
        match self {
            Panel::Search => Panel::Video,
            Panel::Video => Panel::Playlist,
            Panel::Playlist => Panel::Help,
            Panel::Help => Panel::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Search => Panel::Help,
            Panel::Video => Panel::Search,
            Panel::Playlist => Panel::Video,
            Panel::Help => Panel::Playlist,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Search => "Search",
            Panel::Video => "Video URL",
            Panel::Playlist => "Playlist",
            Panel::Help => "Help",
        }
    }
}

/// Whether keys go to the panel's text box or its card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Cards,
}

/// Selection/scroll state for a rendered card list.
#[derive(Debug, Clone, Default)]
pub struct CardListState {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl CardListState {
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

pub struct AppState {
    pub should_quit: bool,

    pub panel: Panel,

    // Search panel
    pub search_query: String,
    pub search_focus: Focus,
    pub search_items: Vec<VideoItem>,
    pub search_list: CardListState,
    pub search_loading: bool,

    // Video URL panel
    pub video_input: String,

    // Playlist panel
    pub playlist_input: String,
    pub playlist_focus: Focus,
    pub playlist_list: CardListState,
    /// Inline message shown in the playlist panel (load failures).
    pub playlist_status: Option<String>,
    pub navigator: Navigator,

    // Playback
    pub playback: Playback,
    pub paused: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: u8,

    // One-line status at the bottom.
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            panel: Panel::Search,
            search_query: String::new(),
            search_focus: Focus::Input,
            search_items: Vec::new(),
            search_list: CardListState::default(),
            search_loading: false,
            video_input: String::new(),
            playlist_input: String::new(),
            playlist_focus: Focus::Input,
            playlist_list: CardListState::default(),
            playlist_status: None,
            navigator: Navigator::new(),
            playback: Playback::Idle,
            paused: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 80,
            status: String::new(),
        }
    }

    /// The text box keys go to on the active panel, if any.
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.panel {
            Panel::Search if self.search_focus == Focus::Input => Some(&mut self.search_query),
            Panel::Video => Some(&mut self.video_input),
            Panel::Playlist if self.playlist_focus == Focus::Input => {
                Some(&mut self.playlist_input)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_cycle_round_trips() {
        let mut p = Panel::Search;
        for _ in 0..4 {
            p = p.next();
        }
        assert_eq!(p, Panel::Search);
        assert_eq!(Panel::Search.prev(), Panel::Help);
    }

    #[test]
    fn card_list_clamps_after_shrink() {
        let mut list = CardListState {
            selected: 7,
            scroll_offset: 0,
        };
        list.clamp(5);
        assert_eq!(list.selected, 4);
        list.clamp(0);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn card_list_selection_bounds() {
        let mut list = CardListState::default();
        list.select_prev();
        assert_eq!(list.selected, 0);
        list.select_next(3);
        list.select_next(3);
        list.select_next(3);
        assert_eq!(list.selected, 2);
    }
}

//! Playback state machine: what the player is currently showing and
//! whether a finished item should pull in the next one.

/// Current playback mode. `Direct` covers search results and pasted URLs;
/// only `PlaylistItem` participates in auto-advance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Idle,
    Direct {
        title: String,
        stream_url: String,
    },
    PlaylistItem {
        index: u64,
        title: String,
        stream_url: String,
    },
}

/// What the app should do when the media ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedAction {
    /// Playing a playlist item with more items after it.
    AdvanceNext,
    /// Direct playback, idle, or terminal at the last item.
    None,
}

impl Playback {
    /// A search result or pasted URL takes over; the caller must also
    /// deactivate the playlist navigator.
    pub fn play_direct(&mut self, title: impl Into<String>, stream_url: impl Into<String>) {
        *self = Playback::Direct {
            title: title.into(),
            stream_url: stream_url.into(),
        };
    }

    pub fn play_playlist_item(
        &mut self,
        index: u64,
        title: impl Into<String>,
        stream_url: impl Into<String>,
    ) {
        *self = Playback::PlaylistItem {
            index,
            title: title.into(),
            stream_url: stream_url.into(),
        };
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Playback::Idle => None,
            Playback::Direct { title, .. } | Playback::PlaylistItem { title, .. } => {
                Some(title.as_str())
            }
        }
    }

    pub fn stream_url(&self) -> Option<&str> {
        match self {
            Playback::Idle => None,
            Playback::Direct { stream_url, .. } | Playback::PlaylistItem { stream_url, .. } => {
                Some(stream_url.as_str())
            }
        }
    }

    pub fn playlist_index(&self) -> Option<u64> {
        match self {
            Playback::PlaylistItem { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Next/previous controls are only shown during playlist playback.
    pub fn controls_visible(&self) -> bool {
        matches!(self, Playback::PlaylistItem { .. })
    }

    /// Media-end decision: advance only mid-playlist; the last item is
    /// terminal (no auto-restart) and direct playback never advances.
    pub fn on_media_ended(&self, total: u64) -> EndedAction {
        match self {
            Playback::PlaylistItem { index, .. } if index + 1 < total => EndedAction::AdvanceNext,
            _ => EndedAction::None,
        }
    }
}

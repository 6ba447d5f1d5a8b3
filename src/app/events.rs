use crate::api::models::{PlaylistPageResponse, VideoItem};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started,
    Paused,
    Position { seconds: f64 },
    Duration { seconds: f64 },
    Ended,
    Error(String),
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Error(String),
    SearchResults {
        query: String,
        items: Vec<VideoItem>,
    },
    /// Completion of a playlist page fetch. `seq` ties the response to the
    /// request the navigator issued; stale ones are dropped there.
    PageFetched {
        seq: u64,
        result: Result<PlaylistPageResponse, String>,
    },
}

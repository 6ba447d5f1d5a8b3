pub mod actions;
pub mod events;
pub mod state;

use crate::api::{self, ProxyClient};
use crate::config::Config;
use crate::input;
use crate::player::mpv::MpvHandle;
use crate::player::state::EndedAction;
use crate::playlist::{FetchOutcome, NavCommand, PageRequest, PlayTarget};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent, PlayerEvent};
use state::{AppState, Focus, Panel};
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    client: ProxyClient,
    mpv: Option<MpvHandle>,
}

impl App {
    pub fn new(cfg: Config, config_path: std::path::PathBuf) -> anyhow::Result<Self> {
        let client = ProxyClient::new(&cfg.server.base_url)?;

        let mut state = AppState::new();
        state.volume = cfg.player.volume;
        if let Some(name) = &cfg.ui.last_panel {
            state.panel = match name.as_str() {
                "video" => Panel::Video,
                "playlist" => Panel::Playlist,
                "help" => Panel::Help,
                _ => Panel::Search,
            };
        }

        Ok(Self {
            cfg,
            config_path,
            state,
            client,
            mpv: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);

        // Player backend is best-effort; the browse UI works without it.
        match MpvHandle::spawn(tx.clone(), self.cfg.player.audio_device.as_deref()).await {
            Ok(h) => {
                if let Err(e) = h.set_volume(self.state.volume).await {
                    tracing::warn!("set initial volume: {e:#}");
                }
                self.mpv = Some(h);
            }
            Err(e) => {
                self.state.status = format!("mpv disabled: {e:#}");
                self.mpv = None;
            }
        }

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx).await;
                    }
                }
                Event::Player(pe) => self.handle_player(pe, &tx).await,
                Event::Network(ne) => self.handle_network(ne, &tx).await,
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        self.save_state_on_quit();
        Ok(())
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.player.volume = self.state.volume;
        self.cfg.ui.last_panel = Some(
            match self.state.panel {
                Panel::Search => "search",
                Panel::Video => "video",
                Panel::Playlist => "playlist",
                Panel::Help => "help",
            }
            .to_string(),
        );
        let _ = crate::config::save(&self.cfg, Some(&self.config_path));
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::NextPanel => self.state.panel = self.state.panel.next(),
            Action::PrevPanel => self.state.panel = self.state.panel.prev(),
            Action::SetPanel(panel) => self.state.panel = panel,

            Action::FocusInput => match self.state.panel {
                Panel::Search => self.state.search_focus = Focus::Input,
                Panel::Playlist => self.state.playlist_focus = Focus::Input,
                _ => {}
            },
            Action::FocusList => match self.state.panel {
                Panel::Search => self.state.search_focus = Focus::Cards,
                Panel::Playlist => self.state.playlist_focus = Focus::Cards,
                _ => {}
            },

            Action::InputChar(c) => {
                if let Some(input) = self.state.active_input_mut() {
                    input.push(c);
                }
            }
            Action::Backspace => {
                if let Some(input) = self.state.active_input_mut() {
                    input.pop();
                }
            }
            Action::ClearInput => {
                if let Some(input) = self.state.active_input_mut() {
                    input.clear();
                }
            }

            Action::Submit => match self.state.panel {
                Panel::Search => self.spawn_search(tx),
                Panel::Video => self.play_video_input().await,
                Panel::Playlist => self.open_playlist(tx),
                Panel::Help => {}
            },

            Action::ListUp => {
                self.active_cards(|list, _| list.select_prev());
            }
            Action::ListDown => {
                self.active_cards(|list, len| list.select_next(len));
            }
            Action::GoTop => {
                self.active_cards(|list, _| list.selected = 0);
            }
            Action::GoBottom => {
                self.active_cards(|list, len| list.selected = len.saturating_sub(1));
            }

            Action::Activate => match self.state.panel {
                Panel::Search => self.play_selected_search_result().await,
                Panel::Playlist => {
                    // The card carries the global index it was rendered
                    // with; never re-derived from the playing index.
                    let offset = self.state.playlist_list.selected;
                    if let Some(index) = self.state.navigator.index_at_offset(offset) {
                        let cmd = self.state.navigator.activate(index);
                        self.run_nav(cmd, tx).await;
                    }
                }
                _ => {}
            },

            Action::PageNext => {
                if let Some(req) = self.state.navigator.page_next() {
                    self.spawn_page_fetch(req, tx);
                }
            }
            Action::PagePrev => {
                if let Some(req) = self.state.navigator.page_prev() {
                    self.spawn_page_fetch(req, tx);
                }
            }

            Action::PlayNext => {
                let cmd = self.state.navigator.next();
                self.run_nav(cmd, tx).await;
            }
            Action::PlayPrev => {
                let cmd = self.state.navigator.previous();
                self.run_nav(cmd, tx).await;
            }

            Action::TogglePause => {
                if let Some(mpv) = &self.mpv
                    && let Err(e) = mpv.toggle_pause().await
                {
                    self.state.status = format!("mpv error: {e:#}");
                }
            }
            Action::VolumeUp => {
                let v = self.state.volume.saturating_add(5).min(100);
                self.state.volume = v;
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.set_volume(v).await;
                }
            }
            Action::VolumeDown => {
                let v = self.state.volume.saturating_sub(5);
                self.state.volume = v;
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.set_volume(v).await;
                }
            }
            Action::SeekForward => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.seek_relative(10.0).await;
                }
            }
            Action::SeekBack => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.seek_relative(-10.0).await;
                }
            }

            Action::Refresh => match self.state.panel {
                Panel::Search => self.spawn_search(tx),
                Panel::Playlist => {
                    let page = self.state.navigator.cache().meta().map(|m| m.page);
                    if let Some(page) = page
                        && let Some(req) = self.state.navigator.goto_page(page)
                    {
                        self.spawn_page_fetch(req, tx);
                    }
                }
                _ => {}
            },

            Action::Resize => {}
        }
    }

    /// Selection helper for whichever card list the active panel shows.
    fn active_cards(&mut self, f: impl FnOnce(&mut state::CardListState, usize)) {
        match self.state.panel {
            Panel::Search => {
                let len = self.state.search_items.len();
                f(&mut self.state.search_list, len);
            }
            Panel::Playlist => {
                let len = self.state.navigator.cache().items().len();
                f(&mut self.state.playlist_list, len);
            }
            _ => {}
        }
    }

    async fn handle_player(&mut self, ev: PlayerEvent, tx: &mpsc::Sender<Event>) {
        match ev {
            PlayerEvent::Started => self.state.paused = false,
            PlayerEvent::Paused => self.state.paused = true,
            PlayerEvent::Position { seconds } => self.state.position_secs = seconds,
            PlayerEvent::Duration { seconds } => self.state.duration_secs = seconds,
            PlayerEvent::Ended => {
                let total = self
                    .state
                    .navigator
                    .cache()
                    .meta()
                    .map(|m| m.total)
                    .unwrap_or(0);
                if self.state.playback.on_media_ended(total) == EndedAction::AdvanceNext {
                    let cmd = self.state.navigator.next();
                    self.run_nav(cmd, tx).await;
                }
            }
            PlayerEvent::Error(msg) => {
                // Best-effort playback: status only, keep the attempted
                // item as now playing.
                self.state.status = msg;
            }
        }
    }

    async fn handle_network(&mut self, ev: NetworkEvent, tx: &mpsc::Sender<Event>) {
        match ev {
            NetworkEvent::Error(msg) => {
                self.state.search_loading = false;
                self.state.status = msg;
            }
            NetworkEvent::SearchResults { query, items } => {
                self.state.status = format!("{} results for \"{query}\"", items.len());
                self.state.search_items = items;
                self.state.search_list.selected = 0;
                self.state.search_list.scroll_offset = 0;
                self.state.search_loading = false;
                if !self.state.search_items.is_empty() {
                    self.state.search_focus = Focus::Cards;
                }
            }
            NetworkEvent::PageFetched { seq, result } => {
                match self.state.navigator.complete_fetch(seq, result) {
                    FetchOutcome::Stale => {}
                    FetchOutcome::Failed(message) => {
                        self.state.playlist_status = Some(message);
                    }
                    FetchOutcome::Loaded(follow_up) => {
                        self.state.playlist_status = None;
                        let len = self.state.navigator.cache().items().len();
                        self.state.playlist_list.clamp(len);
                        if len > 0 {
                            self.state.playlist_focus = Focus::Cards;
                        }
                        self.run_nav(follow_up, tx).await;
                    }
                }
            }
        }
    }

    async fn run_nav(&mut self, cmd: Option<NavCommand>, tx: &mpsc::Sender<Event>) {
        match cmd {
            None => {}
            Some(NavCommand::Fetch(req)) => self.spawn_page_fetch(req, tx),
            Some(NavCommand::Play(target)) => self.start_playlist_item(target).await,
        }
    }

    async fn start_playlist_item(&mut self, target: PlayTarget) {
        let url = self.client.stream_url_for_id(&target.item.id);
        self.state
            .playback
            .play_playlist_item(target.index, target.item.title.clone(), url);
        self.state.status = format!("Playing: {}", target.item.title);
        self.load_into_player().await;
    }

    async fn play_selected_search_result(&mut self) {
        let Some(item) = self
            .state
            .search_items
            .get(self.state.search_list.selected)
            .cloned()
        else {
            return;
        };
        // Direct playback: the playlist position is no longer active.
        self.state.navigator.deactivate();
        let url = self.client.stream_url_for_id(&item.id);
        self.state.playback.play_direct(item.title.clone(), url);
        self.state.status = format!("Playing: {}", item.title);
        self.load_into_player().await;
    }

    async fn play_video_input(&mut self) {
        let Some(source) = api::normalize_video_input(&self.state.video_input) else {
            self.state.status = "Not a video URL or 11-char id".into();
            return;
        };
        self.state.navigator.deactivate();
        let url = self.client.stream_url_for(&source);
        self.state.playback.play_direct("Custom video", url);
        self.state.status = "Playing: Custom video".into();
        self.load_into_player().await;
    }

    /// Hand whatever the playback state now points at to mpv.
    /// Fire-and-forget; a rejected load surfaces later as a player error
    /// event, nothing else.
    async fn load_into_player(&mut self) {
        let Some(url) = self.state.playback.stream_url().map(str::to_string) else {
            return;
        };
        self.state.position_secs = 0.0;
        self.state.duration_secs = 0.0;
        self.state.paused = false;
        if let Some(mpv) = &self.mpv {
            if let Err(e) = mpv.load_url(&url).await {
                self.state.status = format!("mpv error: {e:#}");
            }
        } else {
            self.state.status = format!("mpv unavailable; stream at {url}");
        }
    }

    fn open_playlist(&mut self, tx: &mpsc::Sender<Event>) {
        let url = self.state.playlist_input.trim().to_string();
        if url.is_empty() {
            self.state.status = "Paste a playlist URL first".into();
            return;
        }
        self.state.playlist_status = None;
        let req = self.state.navigator.open(&url);
        self.spawn_page_fetch(req, tx);
    }

    fn spawn_page_fetch(&mut self, req: PageRequest, tx: &mpsc::Sender<Event>) {
        let client = self.client.clone();
        let tx = tx.clone();
        tracing::debug!(page = req.page, seq = req.seq, "fetch playlist page");
        tokio::spawn(async move {
            let result = client
                .playlist_page(&req.source_url, req.page)
                .await
                .map_err(|e| format!("{e:#}"));
            let _ = tx
                .send(Event::Network(NetworkEvent::PageFetched {
                    seq: req.seq,
                    result,
                }))
                .await;
        });
    }

    fn spawn_search(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.search_loading {
            return;
        }
        if self.state.search_query.trim().is_empty() {
            self.state.status = "Type a query first".into();
            return;
        }
        let query = self.state.search_query.trim().to_string();
        self.state.search_loading = true;
        self.state.status = format!("Searching: {query}");

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match client.search(&query).await {
                Ok(items) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::SearchResults { query, items }))
                        .await;
                }
                Err(e) => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::Error(format!(
                            "Search failed: {e:#}"
                        ))))
                        .await;
                }
            }
        });
    }
}

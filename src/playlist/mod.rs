//! Playlist pagination and position reconciliation.
//!
//! The server hands out playlists one page at a time; only the currently
//! loaded page is kept in memory. The [`Navigator`] tracks a single global
//! index across the whole virtual sequence and translates it to
//! (page, local offset) coordinates, requesting page fetches as needed.
//!
//! This module performs no I/O. Operations return [`NavCommand`]s which the
//! app event loop executes; fetch completions come back through
//! [`Navigator::complete_fetch`] tagged with the request's sequence number,
//! so a stale in-flight response never overwrites newer state.

use crate::api::models::{PlaylistPageResponse, VideoItem};

/// Metadata for the currently loaded playlist page, replaced wholesale on
/// every successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistMeta {
    pub source_url: String,
    pub page: u64,
    pub total_pages: u64,
    pub total: u64,
    pub page_size: u64,
}

/// The single cached page: meta plus that page's items. Both halves are
/// replaced in one call so callers never observe meta for page N alongside
/// items for page M.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    meta: Option<PlaylistMeta>,
    items: Vec<VideoItem>,
}

impl PageCache {
    pub fn meta(&self) -> Option<&PlaylistMeta> {
        self.meta.as_ref()
    }

    pub fn items(&self) -> &[VideoItem] {
        &self.items
    }

    fn commit(&mut self, meta: PlaylistMeta, items: Vec<VideoItem>) {
        self.meta = Some(meta);
        self.items = items;
    }
}

/// A page fetch the app loop should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub source_url: String,
    pub page: u64,
    pub seq: u64,
}

/// An item resolved for playback, with the global index it was resolved at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayTarget {
    pub index: u64,
    pub item: VideoItem,
}

/// Effect of a navigation operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Fetch(PageRequest),
    Play(PlayTarget),
}

/// Result of feeding a fetch completion back into the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response for a superseded request; nothing changed.
    Stale,
    /// Page committed. May carry a follow-up: `Play` when a pending
    /// activation resolved on this page, or another `Fetch` when the
    /// server's fresh page size moved the pending target elsewhere.
    Loaded(Option<NavCommand>),
    /// Load failed; cached page and current index are untouched.
    Failed(String),
}

#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    source_url: String,
    /// Global index to activate once the page arrives; `None` for plain
    /// page browsing (pager controls, initial load).
    target: Option<u64>,
}

/// Keeps the global playlist position consistent with the paged cache.
///
/// `current` is `None` while a search result or direct URL is playing
/// (the original frontend's `-1` sentinel).
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    cache: PageCache,
    current: Option<u64>,
    last_seq: u64,
    pending: Option<Pending>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn current_index(&self) -> Option<u64> {
        self.current
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start browsing a playlist: deactivates any playlist position and
    /// fetches page 1. The old cache stays visible until the load commits.
    pub fn open(&mut self, source_url: &str) -> PageRequest {
        self.current = None;
        self.issue(source_url.to_string(), 1, None)
    }

    /// Manual pager: changes which page is shown, never the current index.
    pub fn goto_page(&mut self, page: u64) -> Option<PageRequest> {
        let meta = self.cache.meta()?;
        if page < 1 || page > meta.total_pages {
            return None;
        }
        let url = meta.source_url.clone();
        Some(self.issue(url, page, None))
    }

    pub fn page_next(&mut self) -> Option<PageRequest> {
        let page = self.cache.meta()?.page;
        self.goto_page(page + 1)
    }

    pub fn page_prev(&mut self) -> Option<PageRequest> {
        let page = self.cache.meta()?.page;
        self.goto_page(page.checked_sub(1)?)
    }

    /// Jump to a global index. Silently ignored when no playlist is loaded
    /// or the index is out of range. Returns `Play` when the target page is
    /// already cached, otherwise a `Fetch` carrying the pending target;
    /// the current index only moves once the item actually resolves.
    pub fn activate(&mut self, index: u64) -> Option<NavCommand> {
        let meta = self.cache.meta()?;
        if index >= meta.total {
            return None;
        }
        let page = index / meta.page_size + 1;
        let offset = (index % meta.page_size) as usize;

        if page == meta.page {
            let item = self.cache.items().get(offset)?.clone();
            // A locally resolved activation supersedes any in-flight
            // target; the page load itself may still land.
            self.drop_pending_target();
            self.current = Some(index);
            return Some(NavCommand::Play(PlayTarget { index, item }));
        }

        let url = meta.source_url.clone();
        Some(NavCommand::Fetch(self.issue(url, page, Some(index))))
    }

    /// Advance one item; no-op with no active index or at the last item.
    pub fn next(&mut self) -> Option<NavCommand> {
        let current = self.current?;
        self.activate(current + 1)
    }

    /// Step back one item; no-op with no active index or at the first item.
    pub fn previous(&mut self) -> Option<NavCommand> {
        let current = self.current?;
        if current == 0 {
            return None;
        }
        self.activate(current - 1)
    }

    /// A non-playlist item is taking over playback. Any in-flight
    /// activation target is dropped with the index; the page load itself
    /// may still land.
    pub fn deactivate(&mut self) {
        self.current = None;
        self.drop_pending_target();
    }

    fn drop_pending_target(&mut self) {
        if let Some(p) = &mut self.pending {
            p.target = None;
        }
    }

    /// Local offset of the active item on the loaded page, if it lives
    /// there. Recomputed from scratch for every render.
    pub fn active_offset(&self) -> Option<usize> {
        let meta = self.cache.meta()?;
        let current = self.current?;
        let page = current / meta.page_size + 1;
        if page != meta.page {
            return None;
        }
        let offset = (current % meta.page_size) as usize;
        (offset < self.cache.items().len()).then_some(offset)
    }

    /// Global index of a card rendered at `offset` on the loaded page.
    /// Cards carry this value from render time; activation never re-derives
    /// it from the current index.
    pub fn index_at_offset(&self, offset: usize) -> Option<u64> {
        let meta = self.cache.meta()?;
        if offset >= self.cache.items().len() {
            return None;
        }
        Some((meta.page - 1) * meta.page_size + offset as u64)
    }

    /// Feed back a completed page fetch. Responses whose `seq` is not the
    /// latest issued request are discarded unchanged.
    pub fn complete_fetch(
        &mut self,
        seq: u64,
        result: Result<PlaylistPageResponse, String>,
    ) -> FetchOutcome {
        let pending = match &self.pending {
            Some(p) if p.seq == seq => p.clone(),
            _ => return FetchOutcome::Stale,
        };
        self.pending = None;

        let resp = match result {
            Ok(r) => r,
            Err(message) => return FetchOutcome::Failed(message),
        };

        let meta = PlaylistMeta {
            source_url: pending.source_url,
            page: resp.page.max(1),
            total_pages: resp.total_pages.max(1),
            total: resp.total,
            // index math divides by this; a nonsense server value must not
            // panic the client
            page_size: resp.page_size.max(1),
        };
        self.cache.commit(meta, resp.items);
        self.clamp_current();

        let follow_up = pending.target.and_then(|t| self.resolve_target(t));
        FetchOutcome::Loaded(follow_up)
    }

    /// Pending activation after a commit: play if the target landed on the
    /// loaded page, chase it with a fresh fetch if the new page size says
    /// it lives elsewhere, drop it if the playlist shrank under it.
    fn resolve_target(&mut self, target: u64) -> Option<NavCommand> {
        let meta = self.cache.meta()?;
        if target >= meta.total {
            return None;
        }
        let page = target / meta.page_size + 1;
        let offset = (target % meta.page_size) as usize;

        if page == meta.page {
            let item = self.cache.items().get(offset)?.clone();
            self.current = Some(target);
            return Some(NavCommand::Play(PlayTarget {
                index: target,
                item,
            }));
        }

        let url = meta.source_url.clone();
        Some(NavCommand::Fetch(self.issue(url, page, Some(target))))
    }

    /// The playlist may have shrunk between loads; an index past the end is
    /// clamped to the last item, or cleared when the playlist emptied.
    fn clamp_current(&mut self) {
        let Some(meta) = self.cache.meta() else {
            return;
        };
        if let Some(i) = self.current
            && i >= meta.total
        {
            self.current = meta.total.checked_sub(1);
        }
    }

    fn issue(&mut self, source_url: String, page: u64, target: Option<u64>) -> PageRequest {
        self.last_seq += 1;
        let seq = self.last_seq;
        self.pending = Some(Pending {
            seq,
            source_url: source_url.clone(),
            target,
        });
        PageRequest {
            source_url,
            page,
            seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: u64) -> VideoItem {
        VideoItem {
            id: format!("vid{n:08}"),
            title: format!("Video {n}"),
            thumb: format!("/api/thumb/vid{n:08}"),
            channel: None,
            duration: None,
        }
    }

    fn page_response(page: u64, total: u64, page_size: u64) -> PlaylistPageResponse {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total);
        PlaylistPageResponse {
            page,
            total_pages: total.div_ceil(page_size).max(1),
            total,
            page_size,
            items: (start..end).map(item).collect(),
            error: None,
        }
    }

    /// Opens a playlist and commits page 1 of a total/page_size layout.
    fn loaded_nav(total: u64, page_size: u64) -> Navigator {
        let mut nav = Navigator::new();
        let req = nav.open("https://example.com/playlist");
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(1, total, page_size)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));
        nav
    }

    fn expect_fetch(cmd: Option<NavCommand>) -> PageRequest {
        match cmd {
            Some(NavCommand::Fetch(req)) => req,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    fn expect_play(cmd: Option<NavCommand>) -> PlayTarget {
        match cmd {
            Some(NavCommand::Play(t)) => t,
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn coordinates_for_all_valid_indexes() {
        let total = 20;
        let page_size = 8;
        for index in 0..total {
            let mut nav = loaded_nav(total, page_size);
            let mut cmd = nav.activate(index);
            // Chase fetches until the target resolves.
            while let Some(NavCommand::Fetch(req)) = cmd.clone() {
                assert_eq!(req.page, index / page_size + 1);
                cmd = match nav.complete_fetch(req.seq, Ok(page_response(req.page, total, page_size)))
                {
                    FetchOutcome::Loaded(follow) => follow,
                    other => panic!("unexpected outcome {other:?}"),
                };
            }
            let target = expect_play(cmd);
            assert_eq!(target.index, index);
            assert_eq!(target.item, item(index));
            let meta = nav.cache().meta().unwrap();
            assert_eq!(meta.page, index / page_size + 1);
            assert_eq!(nav.active_offset(), Some((index % page_size) as usize));
        }
    }

    #[test]
    fn activate_on_loaded_page_plays_without_fetch() {
        let mut nav = loaded_nav(20, 8);
        let target = expect_play(nav.activate(3));
        assert_eq!(target.index, 3);
        assert_eq!(nav.current_index(), Some(3));
    }

    #[test]
    fn activate_out_of_range_is_silent() {
        let mut nav = loaded_nav(20, 8);
        assert_eq!(nav.activate(20), None);
        assert_eq!(nav.activate(99), None);
        assert_eq!(nav.current_index(), None);
    }

    #[test]
    fn activate_without_playlist_is_silent() {
        let mut nav = Navigator::new();
        assert_eq!(nav.activate(0), None);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.previous(), None);
    }

    #[test]
    fn page_boundary_crossing_round_trip() {
        // total=20, pageSize=8: index 7 is the last item of page 1.
        let mut nav = loaded_nav(20, 8);
        let target = expect_play(nav.activate(7));
        assert_eq!(target.index, 7);
        assert_eq!(nav.active_offset(), Some(7));

        // next() crosses to page 2, offset 0.
        let req = expect_fetch(nav.next());
        assert_eq!(req.page, 2);
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(2, 20, 8)));
        let target = match outcome {
            FetchOutcome::Loaded(follow) => expect_play(follow),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(target.index, 8);
        assert_eq!(nav.active_offset(), Some(0));

        // previous() crosses back to page 1, offset 7.
        let req = expect_fetch(nav.previous());
        assert_eq!(req.page, 1);
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(1, 20, 8)));
        let target = match outcome {
            FetchOutcome::Loaded(follow) => expect_play(follow),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(target.index, 7);
        assert_eq!(nav.active_offset(), Some(7));
    }

    #[test]
    fn next_at_last_item_is_noop() {
        let mut nav = loaded_nav(8, 8);
        expect_play(nav.activate(7));
        assert_eq!(nav.next(), None);
        assert_eq!(nav.current_index(), Some(7));
    }

    #[test]
    fn previous_at_first_item_is_noop() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(0));
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn failed_load_keeps_cache_and_index() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(2));

        let req = expect_fetch(nav.activate(10));
        let outcome = nav.complete_fetch(req.seq, Err("unavailable".into()));
        assert_eq!(outcome, FetchOutcome::Failed("unavailable".into()));
        // Navigation aborted: previous position and page 1 cache intact.
        assert_eq!(nav.current_index(), Some(2));
        assert_eq!(nav.cache().meta().unwrap().page, 1);
        assert_eq!(nav.cache().items().len(), 8);
    }

    #[test]
    fn failed_fresh_load_has_no_play_effect() {
        let mut nav = Navigator::new();
        let req = nav.open("https://example.com/playlist");
        let outcome = nav.complete_fetch(req.seq, Err("unavailable".into()));
        assert_eq!(outcome, FetchOutcome::Failed("unavailable".into()));
        assert_eq!(nav.current_index(), None);
        assert!(nav.cache().meta().is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut nav = loaded_nav(20, 8);
        let first = expect_fetch(nav.activate(10));
        // A newer navigation supersedes the in-flight one.
        let second = expect_fetch(nav.activate(18));
        assert!(second.seq > first.seq);

        let outcome = nav.complete_fetch(first.seq, Ok(page_response(2, 20, 8)));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(nav.cache().meta().unwrap().page, 1);
        assert_eq!(nav.current_index(), None);

        // The winning request still resolves normally.
        let outcome = nav.complete_fetch(second.seq, Ok(page_response(3, 20, 8)));
        let target = match outcome {
            FetchOutcome::Loaded(follow) => expect_play(follow),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(target.index, 18);
    }

    #[test]
    fn local_activation_supersedes_pending_target() {
        let mut nav = loaded_nav(20, 8);
        let req = expect_fetch(nav.activate(10));
        // Item 3 is on the cached page and plays immediately.
        let target = expect_play(nav.activate(3));
        assert_eq!(target.index, 3);

        // The old fetch still commits its page, but must not re-route
        // playback to the abandoned target.
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(2, 20, 8)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));
        assert_eq!(nav.current_index(), Some(3));
        assert_eq!(nav.cache().meta().unwrap().page, 2);
    }

    #[test]
    fn deactivate_supersedes_pending_target() {
        let mut nav = loaded_nav(20, 8);
        let req = expect_fetch(nav.activate(10));
        // A search result takes over playback before the page lands.
        nav.deactivate();

        let outcome = nav.complete_fetch(req.seq, Ok(page_response(2, 20, 8)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));
        assert_eq!(nav.current_index(), None);
    }

    #[test]
    fn manual_paging_keeps_current_index() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(3));

        let req = nav.page_next().unwrap();
        assert_eq!(req.page, 2);
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(2, 20, 8)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));

        // Index untouched; the active item is just not on this page.
        assert_eq!(nav.current_index(), Some(3));
        assert_eq!(nav.active_offset(), None);
    }

    #[test]
    fn pager_bounds() {
        let mut nav = loaded_nav(20, 8);
        assert!(nav.page_prev().is_none());
        assert!(nav.goto_page(0).is_none());
        assert!(nav.goto_page(4).is_none());
        assert!(nav.goto_page(3).is_some());
    }

    #[test]
    fn exactly_one_active_card_when_on_page() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(5));
        let active: Vec<usize> = (0..nav.cache().items().len())
            .filter(|&off| nav.active_offset() == Some(off))
            .collect();
        assert_eq!(active, vec![5]);
    }

    #[test]
    fn cards_carry_render_time_global_index() {
        let mut nav = loaded_nav(20, 8);
        let req = nav.page_next().unwrap();
        nav.complete_fetch(req.seq, Ok(page_response(2, 20, 8)));
        assert_eq!(nav.index_at_offset(0), Some(8));
        assert_eq!(nav.index_at_offset(7), Some(15));
        assert_eq!(nav.index_at_offset(8), None);
    }

    #[test]
    fn shrunken_total_clamps_current() {
        let mut nav = loaded_nav(20, 8);
        let req = expect_fetch(nav.activate(19));
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(3, 20, 8)));
        match outcome {
            FetchOutcome::Loaded(follow) => {
                expect_play(follow);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(nav.current_index(), Some(19));

        // Playlist re-fetched with fewer items while index 19 is active.
        let req = nav.goto_page(1).unwrap();
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(1, 5, 8)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));
        assert_eq!(nav.current_index(), Some(4));
    }

    #[test]
    fn emptied_playlist_clears_current() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(3));

        let req = nav.goto_page(1).unwrap();
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(1, 0, 8)));
        assert_eq!(outcome, FetchOutcome::Loaded(None));
        assert_eq!(nav.current_index(), None);
    }

    #[test]
    fn changed_page_size_uses_freshest_value() {
        let mut nav = loaded_nav(20, 8);
        let req = expect_fetch(nav.activate(10));
        assert_eq!(req.page, 2);

        // Server now reports 5 items per page: index 10 lives on page 3,
        // so the commit chases it with a fresh fetch.
        let outcome = nav.complete_fetch(req.seq, Ok(page_response(2, 20, 5)));
        let req = match outcome {
            FetchOutcome::Loaded(follow) => expect_fetch(follow),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(req.page, 3);

        let outcome = nav.complete_fetch(req.seq, Ok(page_response(3, 20, 5)));
        let target = match outcome {
            FetchOutcome::Loaded(follow) => expect_play(follow),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(target.index, 10);
        assert_eq!(nav.active_offset(), Some(0));
    }

    #[test]
    fn open_resets_index_but_not_cache_until_commit() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(3));

        let req = nav.open("https://example.com/other");
        assert_eq!(nav.current_index(), None);
        // Old page still visible while the load is in flight.
        assert_eq!(nav.cache().meta().unwrap().source_url, "https://example.com/playlist");

        nav.complete_fetch(req.seq, Ok(page_response(1, 4, 8)));
        assert_eq!(nav.cache().meta().unwrap().source_url, "https://example.com/other");
    }

    #[test]
    fn deactivate_clears_index_only() {
        let mut nav = loaded_nav(20, 8);
        expect_play(nav.activate(3));
        nav.deactivate();
        assert_eq!(nav.current_index(), None);
        assert_eq!(nav.cache().items().len(), 8);
    }
}

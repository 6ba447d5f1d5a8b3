use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::sync::Arc;

pub mod models;

use models::{PlaylistPageResponse, SearchResponse, VideoItem};

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
}

/// Client for the proxy server's JSON API (`/api/search`, `/api/playlist`)
/// and its `/stream` endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    inner: Arc<Inner>,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<VideoItem>> {
        anyhow::ensure!(!query.trim().is_empty(), "empty search query");
        let url = format!(
            "{}/api/search?q={}",
            self.inner.base_url,
            urlencoding::encode(query.trim())
        );

        let resp: SearchResponse = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .context("send search request")?
            .json()
            .await
            .context("parse search json")?;

        if let Some(err) = resp.error.filter(|e| !e.is_empty()) {
            anyhow::bail!("search failed: {err}");
        }
        Ok(resp.items)
    }

    /// Fetch one page of a playlist. A server-reported `error` is returned
    /// as `Err` so callers can keep their previously cached page intact.
    pub async fn playlist_page(
        &self,
        source_url: &str,
        page: u64,
    ) -> anyhow::Result<PlaylistPageResponse> {
        anyhow::ensure!(!source_url.trim().is_empty(), "empty playlist url");
        anyhow::ensure!(page >= 1, "page numbers are 1-based");
        let url = format!(
            "{}/api/playlist?url={}&page={}",
            self.inner.base_url,
            urlencoding::encode(source_url.trim()),
            page
        );

        let resp: PlaylistPageResponse = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .context("send playlist request")?
            .json()
            .await
            .context("parse playlist json")?;

        if let Some(err) = resp.error.as_deref().filter(|e| !e.is_empty()) {
            anyhow::bail!("playlist failed: {err}");
        }
        Ok(resp)
    }

    pub fn stream_url_for_id(&self, id: &str) -> String {
        format!(
            "{}/stream?id={}",
            self.inner.base_url,
            urlencoding::encode(id)
        )
    }

    pub fn stream_url_for(&self, input: &VideoSource) -> String {
        match input {
            VideoSource::Id(id) => self.stream_url_for_id(id),
            VideoSource::Url(url) => format!(
                "{}/stream?url={}",
                self.inner.base_url,
                urlencoding::encode(url)
            ),
        }
    }
}

/// What the user typed into the Video URL box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Id(String),
    Url(String),
}

/// Accepts a bare 11-char video id, `youtu.be/<id>`, `watch?v=<id>`, and
/// `/shorts/<id>` forms; anything else http-ish is passed through as a URL.
pub fn normalize_video_input(input: &str) -> Option<VideoSource> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if s.starts_with("http://") || s.starts_with("https://") {
        for marker in ["youtu.be/", "?v=", "&v=", "/shorts/"] {
            if let Some(pos) = s.find(marker) {
                let tail = &s[pos + marker.len()..];
                let id: String = tail.chars().take(11).collect();
                if is_video_id(&id) {
                    return Some(VideoSource::Id(id));
                }
            }
        }
        return Some(VideoSource::Url(s.to_string()));
    }

    if is_video_id(s) {
        return Some(VideoSource::Id(s.to_string()));
    }
    None
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id() {
        assert_eq!(
            normalize_video_input("dQw4w9WgXcQ"),
            Some(VideoSource::Id("dQw4w9WgXcQ".into()))
        );
    }

    #[test]
    fn short_link() {
        assert_eq!(
            normalize_video_input("https://youtu.be/dQw4w9WgXcQ"),
            Some(VideoSource::Id("dQw4w9WgXcQ".into()))
        );
    }

    #[test]
    fn watch_url() {
        assert_eq!(
            normalize_video_input("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            Some(VideoSource::Id("dQw4w9WgXcQ".into()))
        );
    }

    #[test]
    fn shorts_url() {
        assert_eq!(
            normalize_video_input("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some(VideoSource::Id("dQw4w9WgXcQ".into()))
        );
    }

    #[test]
    fn unknown_http_url_passes_through() {
        assert_eq!(
            normalize_video_input("https://example.com/video.mp4"),
            Some(VideoSource::Url("https://example.com/video.mp4".into()))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(normalize_video_input(""), None);
        assert_eq!(normalize_video_input("not an id"), None);
    }
}

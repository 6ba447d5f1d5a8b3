use serde::{Deserialize, Serialize};

/// One video card as reported by the proxy (search results and playlist
/// pages share this shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// `GET /api/playlist?url=...&page=n` response.
///
/// A non-empty `error` signals failure regardless of HTTP status; a missing
/// `items` array is an empty page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistPageResponse {
    #[serde(default = "one")]
    pub page: u64,
    #[serde(default = "one")]
    pub total_pages: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "one")]
    pub page_size: u64,
    #[serde(default)]
    pub items: Vec<VideoItem>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/search?q=...` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
    #[serde(default)]
    pub error: Option<String>,
}

fn one() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playlist_page() {
        let raw = r#"{
            "page": 2,
            "totalPages": 3,
            "total": 20,
            "pageSize": 8,
            "items": [
                {"id": "abc123def45", "title": "First", "thumb": "/api/thumb/abc123def45", "channel": "Ch", "duration": "3:21"},
                {"id": "xyz987uvw65", "title": "Second", "thumb": "/api/thumb/xyz987uvw65"}
            ]
        }"#;
        let resp: PlaylistPageResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.total, 20);
        assert_eq!(resp.page_size, 8);
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[1].channel, None);
        assert!(resp.error.is_none());
    }

    #[test]
    fn missing_items_is_empty_page() {
        let resp: PlaylistPageResponse =
            serde_json::from_str(r#"{"page":1,"totalPages":1,"total":0,"pageSize":8}"#).unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn error_field_survives_parsing() {
        let resp: PlaylistPageResponse =
            serde_json::from_str(r#"{"items":[],"error":"unavailable"}"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some("unavailable"));
    }

    #[test]
    fn parses_search_response() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"items":[{"id":"abc123def45","title":"Hit","thumb":""}]}"#,
        )
        .unwrap();
        assert_eq!(resp.items.len(), 1);
    }
}

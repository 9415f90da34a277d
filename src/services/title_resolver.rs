//! Title Resolver for Tagmark.
//!
//! Looks up a human-readable title for a bookmarked page: the YouTube Data API
//! for YouTube videos when an API key is configured, otherwise the page's
//! HTML `<title>` element.

use std::time::Duration;

use async_trait::async_trait;
use select::document::Document;
use select::predicate::Name;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::types::errors::TitleError;

/// Upper bound on how much of a page body is read while looking for a title.
const MAX_BODY_BYTES: usize = 1024 * 1024;

const CLOSING_TAG: &[u8] = b"</title";

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Trait defining page title lookup.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Returns the page title for `url`, or an error describing why none was found.
    async fn resolve(&self, url: &Url) -> Result<String, TitleError>;
}

/// Title resolver that fetches pages over HTTP.
pub struct HttpTitleResolver {
    client: reqwest::Client,
    youtube_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
}

impl HttpTitleResolver {
    /// Creates a resolver whose requests give up after `timeout`.
    ///
    /// An empty `youtube_key` disables the YouTube API lookup.
    pub fn new(timeout: Duration, youtube_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tagmark/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            youtube_key: youtube_key.filter(|k| !k.is_empty()),
        }
    }

    /// Fetches the page and extracts its `<title>`, reading at most `MAX_BODY_BYTES`.
    async fn fetch_html_title(&self, url: &Url) -> Result<String, TitleError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TitleError::NetworkError(e.to_string()))?;

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TitleError::ReadError(e.to_string()))?
        {
            // Only the new bytes (plus a tag-sized overlap) are scanned for the closing tag.
            let scan_from = body.len().saturating_sub(CLOSING_TAG.len());
            body.extend_from_slice(&chunk);
            if contains_closing_tag(&body[scan_from..]) || body.len() >= MAX_BODY_BYTES {
                break;
            }
        }
        body.truncate(MAX_BODY_BYTES);

        extract_title(&String::from_utf8_lossy(&body)).ok_or(TitleError::NoTitle)
    }

    async fn fetch_youtube_title(&self, video_id: &str, key: &str) -> Result<String, TitleError> {
        let list: VideoList = self
            .client
            .get(YOUTUBE_API_URL)
            .query(&[("part", "snippet"), ("id", video_id), ("key", key)])
            .send()
            .await
            .map_err(|e| TitleError::ApiError(e.to_string()))?
            .error_for_status()
            .map_err(|e| TitleError::ApiError(e.to_string()))?
            .json()
            .await
            .map_err(|e| TitleError::ApiError(e.to_string()))?;

        list.items
            .into_iter()
            .next()
            .map(|item| format!("{} - YouTube", item.snippet.title))
            .ok_or_else(|| TitleError::ApiError(format!("video {} not found", video_id)))
    }
}

#[async_trait]
impl TitleResolver for HttpTitleResolver {
    async fn resolve(&self, url: &Url) -> Result<String, TitleError> {
        if let (Some(key), Some(video_id)) = (self.youtube_key.as_deref(), youtube_video_id(url)) {
            match self.fetch_youtube_title(&video_id, key).await {
                Ok(title) => return Ok(title),
                Err(e) => debug!(%url, error = %e, "youtube lookup failed, scraping page"),
            }
        }
        self.fetch_html_title(url).await
    }
}

/// Extracts the text of the first `<title>` element, entities decoded and
/// surrounding whitespace trimmed. An empty title counts as none.
pub fn extract_title(html: &str) -> Option<String> {
    Document::from(html)
        .find(Name("title"))
        .next()
        .map(|n| n.text().trim().to_owned())
        .filter(|title| !title.is_empty())
}

fn contains_closing_tag(bytes: &[u8]) -> bool {
    bytes
        .windows(CLOSING_TAG.len())
        .any(|w| w.eq_ignore_ascii_case(CLOSING_TAG))
}

/// Returns the video id of a YouTube watch or short link.
pub fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    match host.as_str() {
        "youtube.com" | "www.youtube.com" | "m.youtube.com" if url.path() == "/watch" => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty()),
        "youtu.be" => url
            .path_segments()?
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

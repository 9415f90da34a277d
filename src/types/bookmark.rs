use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::errors::BookmarkError;
use super::tag::TagSet;
use crate::services::title_resolver::TitleResolver;

/// Represents a saved bookmark.
///
/// The URL and the tag set are only reachable through methods; the JSON form
/// flattens both next to the public fields via [`BookmarkRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BookmarkRecord", try_from = "BookmarkRecord")]
pub struct Bookmark {
    pub title: String,
    pub date: DateTime<Utc>,
    /// The URL exactly as submitted by the client.
    pub raw_url: String,
    url: Option<Url>,
    tags: TagSet,
}

impl Bookmark {
    /// Creates an empty bookmark stamped with the current time.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            date: Utc::now(),
            raw_url: String::new(),
            url: None,
            tags: TagSet::new(),
        }
    }

    /// Parses `raw_url` and returns a bookmark whose title is the raw URL.
    pub fn parse(raw_url: &str) -> Result<Self, BookmarkError> {
        let url = parse_url(raw_url)?;
        let mut bookmark = Self::new();
        bookmark.url = Some(url);
        bookmark.raw_url = raw_url.to_string();
        bookmark.title = raw_url.to_string();
        Ok(bookmark)
    }

    /// Parses `raw_url` and looks up the page title.
    ///
    /// Only URL parsing can fail. A failed title lookup is logged and the
    /// raw URL is kept as the title.
    pub async fn from_url(
        raw_url: &str,
        resolver: &dyn TitleResolver,
    ) -> Result<Self, BookmarkError> {
        let mut bookmark = Self::parse(raw_url)?;
        if let Some(url) = bookmark.url.as_ref() {
            match resolver.resolve(url).await {
                Ok(title) => bookmark.title = title,
                Err(e) => warn!(url = %raw_url, error = %e, "title lookup failed, keeping raw url"),
            }
        }
        Ok(bookmark)
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Canonical string form of the URL, empty for a bare bookmark.
    pub fn url_string(&self) -> String {
        self.url.as_ref().map(Url::to_string).unwrap_or_default()
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.add(tags);
    }

    pub fn delete_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.delete(tags);
    }

    pub fn reset_tags(&mut self) {
        self.tags.reset();
    }

    pub fn has_tags<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.has(tags)
    }

    pub fn get_tags(&self) -> Vec<String> {
        self.tags.list()
    }
}

impl Default for Bookmark {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an absolute URL, mapping failures to [`BookmarkError::InvalidUrl`].
pub fn parse_url(raw_url: &str) -> Result<Url, BookmarkError> {
    Url::parse(raw_url).map_err(|e| BookmarkError::InvalidUrl(format!("{}: {}", raw_url, e)))
}

/// On-disk and on-wire shape of a [`Bookmark`].
///
/// `Tags` is accepted as `null`, which older database files contain for
/// bookmarks without tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookmarkRecord {
    #[serde(default)]
    pub title: String,
    pub date: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<Bookmark> for BookmarkRecord {
    fn from(bookmark: Bookmark) -> Self {
        let mut tags = bookmark.tags.list();
        tags.sort();
        Self {
            url: bookmark.url_string(),
            title: bookmark.title,
            date: bookmark.date,
            raw_url: bookmark.raw_url,
            tags: Some(tags),
        }
    }
}

impl TryFrom<BookmarkRecord> for Bookmark {
    type Error = BookmarkError;

    fn try_from(record: BookmarkRecord) -> Result<Self, Self::Error> {
        let url = parse_url(&record.url)?;
        let mut bookmark = Bookmark {
            title: record.title,
            date: record.date,
            raw_url: record.raw_url,
            url: Some(url),
            tags: TagSet::new(),
        };
        bookmark.reset_tags();
        bookmark.add_tags(record.tags.unwrap_or_default());
        Ok(bookmark)
    }
}

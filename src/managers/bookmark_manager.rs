//! Bookmark Manager for Tagmark.
//!
//! Implements `BookmarkManagerTrait`: the create/update/delete/retrieve
//! actions of the protocol, applied to the shared JSON-backed [`Database`].
//!
//! Every mutation and the `persist()` that follows it happen under a single
//! lock acquisition. If persisting fails the in-memory change is rolled back.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::database::Database;
use crate::services::title_resolver::TitleResolver;
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;
use crate::types::protocol::BookmarkRequest;

/// Bookmarks affected by an action, keyed by normalized URL.
pub type BookmarkMap = BTreeMap<String, Bookmark>;

/// Trait defining bookmark protocol operations.
#[async_trait]
pub trait BookmarkManagerTrait {
    /// Creates a bookmark for `url`, resolving its title first.
    async fn create(&self, url: &str, tags: &[String]) -> Result<BookmarkMap, BookmarkError>;
    /// Replaces the tags when `tags` is non-empty, then adds, then removes.
    fn update(
        &self,
        url: &str,
        tags: Option<&[String]>,
        add_tags: Option<&[String]>,
        del_tags: Option<&[String]>,
    ) -> Result<BookmarkMap, BookmarkError>;
    fn delete(&self, url: &str) -> Result<BookmarkMap, BookmarkError>;
    /// Returns one bookmark, or every bookmark when `url` is `None`.
    fn retrieve(&self, url: Option<&str>) -> Result<BookmarkMap, BookmarkError>;
}

/// Bookmark manager backed by a shared [`Database`].
#[derive(Clone)]
pub struct BookmarkManager {
    db: Arc<Mutex<Database>>,
    titles: Arc<dyn TitleResolver>,
}

impl BookmarkManager {
    pub fn new(db: Arc<Mutex<Database>>, titles: Arc<dyn TitleResolver>) -> Self {
        Self { db, titles }
    }

    /// Returns the shared database handle.
    pub fn database(&self) -> &Arc<Mutex<Database>> {
        &self.db
    }

    /// Dispatches a decoded request to the matching operation.
    pub async fn execute(&self, request: &BookmarkRequest) -> Result<BookmarkMap, BookmarkError> {
        match request {
            BookmarkRequest::Create { url, tags } => self.create(url, tags).await,
            BookmarkRequest::Update {
                url,
                tags,
                add_tags,
                del_tags,
            } => self.update(
                url,
                tags.as_deref(),
                add_tags.as_deref(),
                del_tags.as_deref(),
            ),
            BookmarkRequest::Delete { url } => self.delete(url),
            BookmarkRequest::Retrieve { url } => self.retrieve(url.as_deref()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, BookmarkError> {
        self.db
            .lock()
            .map_err(|e| BookmarkError::IoError(format!("database lock poisoned: {}", e)))
    }

    /// Stores `bookmark` and persists, restoring the previous entry on failure.
    fn commit(db: &mut Database, bookmark: Bookmark) -> Result<(), BookmarkError> {
        let key = bookmark.url_string();
        let previous = db.insert(bookmark);
        if let Err(e) = db.persist() {
            match previous {
                Some(prev) => {
                    db.insert(prev);
                }
                None => {
                    db.remove(&key);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn single(bookmark: Bookmark) -> BookmarkMap {
        let mut result = BookmarkMap::new();
        result.insert(bookmark.url_string(), bookmark);
        result
    }
}

#[async_trait]
impl BookmarkManagerTrait for BookmarkManager {
    async fn create(&self, url: &str, tags: &[String]) -> Result<BookmarkMap, BookmarkError> {
        // The title lookup runs before the lock so a slow page never blocks other requests.
        let mut bookmark = Bookmark::from_url(url, self.titles.as_ref()).await?;
        if !tags.is_empty() {
            bookmark.add_tags(tags);
        }

        let mut db = self.lock()?;
        Self::commit(&mut db, bookmark.clone())?;
        debug!(url = %bookmark.url_string(), total = db.len(), "bookmark stored");
        Ok(Self::single(bookmark))
    }

    fn update(
        &self,
        url: &str,
        tags: Option<&[String]>,
        add_tags: Option<&[String]>,
        del_tags: Option<&[String]>,
    ) -> Result<BookmarkMap, BookmarkError> {
        let mut db = self.lock()?;
        let mut bookmark = db.get(url)?.clone();

        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            bookmark.reset_tags();
            bookmark.add_tags(tags);
        }
        if let Some(add) = add_tags {
            bookmark.add_tags(add);
        }
        if let Some(del) = del_tags {
            bookmark.delete_tags(del);
        }

        Self::commit(&mut db, bookmark.clone())?;
        Ok(Self::single(bookmark))
    }

    fn delete(&self, url: &str) -> Result<BookmarkMap, BookmarkError> {
        let mut db = self.lock()?;
        let bookmark = db.get(url)?.clone();

        db.delete(&bookmark);
        if let Err(e) = db.persist() {
            db.insert(bookmark);
            return Err(e);
        }
        debug!(url = %bookmark.url_string(), total = db.len(), "bookmark removed");
        Ok(Self::single(bookmark))
    }

    fn retrieve(&self, url: Option<&str>) -> Result<BookmarkMap, BookmarkError> {
        let db = self.lock()?;
        match url.filter(|u| !u.is_empty()) {
            Some(url) => Ok(Self::single(db.get(url)?.clone())),
            None => Ok(db.list()),
        }
    }
}

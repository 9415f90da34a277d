//! In-memory bookmark database backed by a single JSON file.
//!
//! Provides the [`Database`] struct: a URL-keyed map of bookmarks that is
//! hydrated from disk at startup and rewritten in full by [`Database::persist`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use super::snapshot::{DatabaseFile, DatabaseFileRef};
use crate::types::bookmark::Bookmark;
use crate::types::errors::BookmarkError;

/// URL-keyed bookmark collection.
///
/// Keys are always derived from the stored bookmark's own URL, so
/// `bookmarks[key].url_string() == key` holds for every entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    bookmarks: HashMap<String, Bookmark>,
    filename: Option<PathBuf>,
}

impl Database {
    /// Creates an empty database with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database that persists to `path`.
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            bookmarks: HashMap::new(),
            filename: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Loads the database stored at `path`.
    ///
    /// A missing or zero-byte file yields an empty database bound to `path`.
    ///
    /// # Errors
    /// Returns `IoError` if the file exists but cannot be read, and
    /// `CorruptData` if its contents are not a valid database document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BookmarkError> {
        let path = path.as_ref();
        let mut db = Self::with_file(path);

        if !path.exists() {
            debug!(path = %path.display(), "database file missing, starting empty");
            return Ok(db);
        }

        let bytes = fs::read(path)
            .map_err(|e| BookmarkError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        if bytes.is_empty() {
            return Ok(db);
        }

        let file: DatabaseFile = serde_json::from_slice(&bytes)
            .map_err(|e| BookmarkError::CorruptData(format!("{}: {}", path.display(), e)))?;

        for bookmark in file.bookmarks.unwrap_or_default().into_values() {
            db.add(bookmark);
        }
        debug!(path = %path.display(), count = db.len(), "database loaded");
        Ok(db)
    }

    /// Creates the parent directory and an empty database file when absent.
    pub fn ensure_file<P: AsRef<Path>>(path: P) -> Result<(), BookmarkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_private_dir(parent).map_err(|e| {
                    BookmarkError::IoError(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        if !path.exists() {
            write_private_file(path, b"").map_err(|e| {
                BookmarkError::IoError(format!("Failed to create {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Inserts `bookmark`, replacing any entry with the same URL.
    pub fn add(&mut self, bookmark: Bookmark) {
        self.insert(bookmark);
    }

    /// Inserts `bookmark` and returns the entry it replaced.
    pub(crate) fn insert(&mut self, bookmark: Bookmark) -> Option<Bookmark> {
        self.bookmarks.insert(bookmark.url_string(), bookmark)
    }

    /// Looks up a bookmark by URL. The argument is normalized the same way
    /// stored keys are, so `http://example.com` finds `http://example.com/`.
    pub fn get(&self, url: &str) -> Result<&Bookmark, BookmarkError> {
        self.bookmarks
            .get(&normalize_key(url))
            .ok_or_else(|| BookmarkError::NotFound(url.to_string()))
    }

    /// Removes the entry stored under `bookmark`'s URL, if any.
    pub fn delete(&mut self, bookmark: &Bookmark) {
        self.remove(&bookmark.url_string());
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Bookmark> {
        self.bookmarks.remove(key)
    }

    /// Returns a snapshot of every bookmark keyed by URL.
    pub fn list(&self) -> BTreeMap<String, Bookmark> {
        self.bookmarks
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Writes the whole database to its file, replacing previous contents.
    ///
    /// # Errors
    /// `NoFileConfigured` when the database has no file, `IoError` when
    /// serialization or the write fails.
    pub fn persist(&self) -> Result<(), BookmarkError> {
        let path = self.filename.as_deref().ok_or(BookmarkError::NoFileConfigured)?;

        let file = DatabaseFileRef {
            bookmarks: self.bookmarks.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            filename: path.to_string_lossy().to_string(),
        };
        let json = serde_json::to_vec(&file)
            .map_err(|e| BookmarkError::IoError(format!("Failed to serialize database: {}", e)))?;

        write_private_file(path, &json)
            .map_err(|e| BookmarkError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), count = self.len(), "database persisted");
        Ok(())
    }
}

/// Canonical key for a URL string; unparsable input is used verbatim.
pub fn normalize_key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[cfg(unix)]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

//! JSON document layout of the database file.
//!
//! ```json
//! {"Bookmarks": {"http://example.com/": {"Title": "...", "Date": "...", "Url": "...", "RawUrl": "...", "Tags": []}},
//!  "Filename": "/home/me/.local/share/tagmark/db.json"}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// Owned form, used when loading.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseFile {
    #[serde(default)]
    pub bookmarks: Option<BTreeMap<String, Bookmark>>,
    #[serde(default)]
    pub filename: String,
}

/// Borrowed form, used when persisting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseFileRef<'a> {
    pub bookmarks: BTreeMap<&'a str, &'a Bookmark>,
    pub filename: String,
}

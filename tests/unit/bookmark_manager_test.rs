//! Unit tests for the bookmark manager: the four protocol actions applied to
//! a shared database, including persistence and rollback.

use std::sync::{Arc, Mutex};

use futures_util::future::join_all;

use async_trait::async_trait;
use tagmark::database::Database;
use tagmark::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use tagmark::services::title_resolver::TitleResolver;
use tagmark::types::errors::{BookmarkError, TitleError};
use tagmark::types::protocol::BookmarkRequest;
use tempfile::TempDir;
use url::Url;

/// Resolves every page to `"Title of <host>"`.
struct HostTitles;

#[async_trait]
impl TitleResolver for HostTitles {
    async fn resolve(&self, url: &Url) -> Result<String, TitleError> {
        Ok(format!("Title of {}", url.host_str().unwrap_or("")))
    }
}

struct Offline;

#[async_trait]
impl TitleResolver for Offline {
    async fn resolve(&self, _url: &Url) -> Result<String, TitleError> {
        Err(TitleError::NetworkError("offline".to_string()))
    }
}

fn strings(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn setup() -> (BookmarkManager, TempDir) {
    let tmp = TempDir::new().expect("temp dir");
    let db = Database::with_file(tmp.path().join("db.json"));
    let manager = BookmarkManager::new(Arc::new(Mutex::new(db)), Arc::new(HostTitles));
    (manager, tmp)
}

#[tokio::test]
async fn test_create_resolves_title_and_lowercases_tags() {
    let (manager, _tmp) = setup();
    let result = manager
        .create("http://example.com", &strings(&["Tata", "YOYO"]))
        .await
        .unwrap();

    let b = &result["http://example.com/"];
    assert_eq!(b.title, "Title of example.com");
    assert_eq!(b.raw_url, "http://example.com");
    assert!(b.has_tags(["tata", "yoyo"]));
    assert_eq!(b.get_tags().len(), 2);
}

#[tokio::test]
async fn test_create_keeps_raw_url_when_title_fails() {
    let tmp = TempDir::new().unwrap();
    let db = Database::with_file(tmp.path().join("db.json"));
    let manager = BookmarkManager::new(Arc::new(Mutex::new(db)), Arc::new(Offline));

    let result = manager.create("https://example.org/page", &[]).await.unwrap();
    assert_eq!(result["https://example.org/page"].title, "https://example.org/page");
}

#[tokio::test]
async fn test_create_invalid_url() {
    let (manager, _tmp) = setup();
    match manager.create("not a url", &[]).await {
        Err(BookmarkError::InvalidUrl(_)) => {}
        other => panic!("expected InvalidUrl, got {:?}", other),
    }
    assert!(manager.retrieve(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_create_persists_to_file() {
    let (manager, tmp) = setup();
    manager.create("http://example.com", &strings(&["a"])).await.unwrap();

    let reopened = Database::open(tmp.path().join("db.json")).unwrap();
    assert!(reopened.get("http://example.com").unwrap().has_tags(["a"]));
}

#[tokio::test]
async fn test_create_existing_url_overwrites() {
    let (manager, _tmp) = setup();
    manager.create("http://example.com", &strings(&["old"])).await.unwrap();
    manager.create("http://example.com/", &strings(&["new"])).await.unwrap();

    let all = manager.retrieve(None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["http://example.com/"].get_tags(), vec!["new"]);
}

#[tokio::test]
async fn test_create_rolls_back_when_persist_fails() {
    let manager = BookmarkManager::new(Arc::new(Mutex::new(Database::new())), Arc::new(HostTitles));
    assert_eq!(
        manager.create("http://example.com", &[]).await.unwrap_err(),
        BookmarkError::NoFileConfigured
    );
    assert!(manager.database().lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_replace_then_add_then_delete() {
    let (manager, _tmp) = setup();
    manager.create("http://example.com", &strings(&["a", "b"])).await.unwrap();

    let tags = strings(&["x", "y"]);
    let add = strings(&["Z", "a"]);
    let del = strings(&["y", "a"]);
    let result = manager
        .update("http://example.com", Some(tags.as_slice()), Some(add.as_slice()), Some(del.as_slice()))
        .unwrap();

    let mut got = result["http://example.com/"].get_tags();
    got.sort();
    assert_eq!(got, vec!["x", "z"]);
}

#[tokio::test]
async fn test_update_empty_tags_with_add_keeps_existing() {
    let (manager, _tmp) = setup();
    manager.create("http://google.com", &strings(&["tata", "yoyo"])).await.unwrap();

    let add = strings(&["pomme"]);
    let result = manager
        .update("http://google.com", Some(&[][..]), Some(add.as_slice()), None)
        .unwrap();

    let mut got = result["http://google.com/"].get_tags();
    got.sort();
    assert_eq!(got, vec!["pomme", "tata", "yoyo"]);
}

#[tokio::test]
async fn test_update_without_tags_keeps_existing() {
    let (manager, _tmp) = setup();
    manager.create("http://example.com", &strings(&["a"])).await.unwrap();

    let add = strings(&["b"]);
    let result = manager.update("http://example.com", None, Some(add.as_slice()), None).unwrap();
    assert!(result["http://example.com/"].has_tags(["a", "b"]));
}

#[test]
fn test_update_missing_is_not_found() {
    let (manager, _tmp) = setup();
    match manager.update("http://nowhere.org", None, None, None) {
        Err(BookmarkError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_update_rolls_back_when_persist_fails() {
    let mut db = Database::new();
    let mut b = tagmark::types::bookmark::Bookmark::parse("http://example.com").unwrap();
    b.add_tags(["keep"]);
    db.add(b);
    let manager = BookmarkManager::new(Arc::new(Mutex::new(db)), Arc::new(HostTitles));

    let add = strings(&["lost"]);
    assert!(manager.update("http://example.com", None, Some(add.as_slice()), None).is_err());

    let db = manager.database().lock().unwrap();
    assert_eq!(db.get("http://example.com").unwrap().get_tags(), vec!["keep"]);
}

#[tokio::test]
async fn test_delete_returns_removed_bookmark() {
    let (manager, tmp) = setup();
    manager.create("http://example.com", &[]).await.unwrap();

    let removed = manager.delete("http://example.com").unwrap();
    assert!(removed.contains_key("http://example.com/"));
    assert!(manager.retrieve(None).unwrap().is_empty());
    assert!(Database::open(tmp.path().join("db.json")).unwrap().is_empty());
}

#[test]
fn test_delete_missing_is_not_found() {
    let (manager, _tmp) = setup();
    assert!(matches!(
        manager.delete("http://example.com"),
        Err(BookmarkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_retrieve_one_and_all() {
    let (manager, _tmp) = setup();
    manager.create("http://a.com", &[]).await.unwrap();
    manager.create("http://b.com", &[]).await.unwrap();

    let one = manager.retrieve(Some("http://a.com")).unwrap();
    assert_eq!(one.len(), 1);
    assert!(one.contains_key("http://a.com/"));

    assert_eq!(manager.retrieve(None).unwrap().len(), 2);
    assert_eq!(manager.retrieve(Some("")).unwrap().len(), 2);
}

#[test]
fn test_retrieve_missing_is_not_found() {
    let (manager, _tmp) = setup();
    assert!(matches!(
        manager.retrieve(Some("http://example.com")),
        Err(BookmarkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_execute_dispatches_requests() {
    let (manager, _tmp) = setup();
    let create = BookmarkRequest::Create {
        url: "http://example.com".to_string(),
        tags: strings(&["t"]),
    };
    assert_eq!(manager.execute(&create).await.unwrap().len(), 1);

    let delete = BookmarkRequest::Delete {
        url: "http://example.com".to_string(),
    };
    assert_eq!(manager.execute(&delete).await.unwrap().len(), 1);

    let retrieve = BookmarkRequest::Retrieve { url: None };
    assert!(manager.execute(&retrieve).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_are_serialized() {
    let (manager, tmp) = setup();
    let shared = "http://shared.com";

    // Distinct URLs plus repeated creates of one shared URL.
    let creates = (0..20)
        .map(|i| format!("http://site{}.com", i))
        .chain((0..5).map(|_| shared.to_string()))
        .map(|url| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.create(&url, &strings(&["base"])).await })
        });
    for joined in join_all(creates).await {
        joined.unwrap().unwrap();
    }

    // Every update adds its own tag to the shared bookmark.
    let updates = (0..25).map(|i| {
        let manager = manager.clone();
        tokio::spawn(async move {
            let add = vec![format!("tag{}", i)];
            manager.update(shared, None, Some(add.as_slice()), None)
        })
    });
    for joined in join_all(updates).await {
        joined.unwrap().unwrap();
    }

    let in_memory = manager.retrieve(None).unwrap();
    assert_eq!(in_memory.len(), 21);

    let reopened = Database::open(tmp.path().join("db.json")).unwrap();
    assert_eq!(reopened.len(), in_memory.len());
    assert_eq!(reopened.list(), in_memory);

    let stored = reopened.get(shared).unwrap();
    assert_eq!(stored.get_tags().len(), 26);
    assert!(stored.has_tags((0..25).map(|i| format!("tag{}", i))));
    assert!(stored.has_tags(["base"]));
}

//! App Core for Tagmark.
//!
//! Central struct wiring the database, the title resolver, the auth gate and
//! the bookmark manager together. One `App` is shared by every connection.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use crate::database::Database;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::auth_gate::{AuthGate, SharedCredentials};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::title_resolver::{HttpTitleResolver, TitleResolver};
use crate::types::settings::ServerSettings;

/// Central application struct shared by all transports.
pub struct App {
    pub bookmarks: BookmarkManager,
    pub auth_gate: AuthGate,
}

impl App {
    /// Creates a new App from loaded settings.
    ///
    /// Creates the database file (and its directory) when missing, then
    /// hydrates the database from it.
    pub fn new(settings: &ServerSettings, db_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Database::ensure_file(db_path)?;
        let db = Database::open(db_path)?;
        info!(path = %db_path.display(), bookmarks = db.len(), "database ready");

        let youtube_key = Some(settings.youtube_key.clone()).filter(|k| !k.is_empty());
        let titles = Arc::new(HttpTitleResolver::new(
            Duration::from_secs(settings.title_timeout_secs),
            youtube_key,
        ));

        let auth_gate = AuthGate::new(Box::new(SharedCredentials::new(
            settings.username.clone(),
            settings.password.clone(),
        )));
        if auth_gate.is_open() {
            info!("no credentials configured, every request is authorized");
        }

        Ok(Self::from_parts(db, titles, auth_gate))
    }

    /// Assembles an App from already-built components.
    pub fn from_parts(db: Database, titles: Arc<dyn TitleResolver>, auth_gate: AuthGate) -> Self {
        Self {
            bookmarks: BookmarkManager::new(Arc::new(Mutex::new(db)), titles),
            auth_gate,
        }
    }

    /// Startup sequence: load settings from `$TAGMARK_CONFIG` (or the platform
    /// default) and build the App they describe.
    pub fn from_environment() -> Result<(Self, ServerSettings), Box<dyn std::error::Error>> {
        let mut engine = SettingsEngine::new(None);
        let settings = engine.load()?;
        info!(config = engine.get_config_path(), "settings loaded");
        let app = Self::new(&settings, &engine.db_path())?;
        Ok((app, settings))
    }
}

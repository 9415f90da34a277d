// Tagmark Settings Engine
// Loads the server configuration from a JSON file and resolves derived paths.
// The file is read once at startup; the running server never writes it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ServerSettings;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TAGMARK_CONFIG";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ServerSettings, SettingsError>;
    fn get_settings(&self) -> &ServerSettings;
    fn get_config_path(&self) -> &str;
    fn db_path(&self) -> PathBuf;
}

/// Settings engine implementation that reads settings from JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ServerSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise uses `$TAGMARK_CONFIG`, falling back to `config.json` in the
    /// platform-specific config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(p) if !p.is_empty() => p,
                _ => platform::get_config_dir()
                    .join("config.json")
                    .to_string_lossy()
                    .to_string(),
            },
        };

        Self {
            config_path,
            settings: ServerSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing or empty file yields default settings.
    /// A malformed file returns a serialization error.
    fn load(&mut self) -> Result<ServerSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ServerSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        if content.trim().is_empty() {
            self.settings = ServerSettings::default();
            return Ok(self.settings.clone());
        }

        let settings: ServerSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Returns the path to the config file.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }

    /// Returns the database file path, defaulting to `db.json` in the
    /// platform data directory when none is configured.
    fn db_path(&self) -> PathBuf {
        if self.settings.db_file.is_empty() {
            platform::get_data_dir().join("db.json")
        } else {
            PathBuf::from(&self.settings.db_file)
        }
    }
}

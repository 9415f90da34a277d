use serde::{Deserialize, Serialize};

/// Server configuration, read once at startup.
///
/// Every field has a default so a partial (or empty) configuration file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    /// Database file. Empty means the platform data directory.
    pub db_file: String,
    pub username: String,
    pub password: String,
    /// YouTube Data API key. Empty disables the API lookup.
    pub youtube_key: String,
    pub title_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            db_file: String::new(),
            username: String::new(),
            password: String::new(),
            youtube_key: String::new(),
            title_timeout_secs: 5,
        }
    }
}

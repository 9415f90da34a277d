// Tagmark platform abstraction
// Default locations for the configuration file and the bookmark database.
//
// Uses `cfg(target_os)` to pick the platform-specific implementation at
// compile time. Other unix targets share the Linux XDG layout.

use std::path::PathBuf;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
use linux as imp;

#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
use windows as imp;

/// Returns the directory holding `config.json`.
///
/// - **Linux**: `~/.config/tagmark` (or `$XDG_CONFIG_HOME/tagmark`)
/// - **macOS**: `~/Library/Application Support/Tagmark`
/// - **Windows**: `%APPDATA%/Tagmark`
pub fn get_config_dir() -> PathBuf {
    imp::get_config_dir()
}

/// Returns the directory holding the default `db.json`.
///
/// - **Linux**: `~/.local/share/tagmark` (or `$XDG_DATA_HOME/tagmark`)
/// - **macOS**: `~/Library/Application Support/Tagmark`
/// - **Windows**: `%APPDATA%/Tagmark`
pub fn get_data_dir() -> PathBuf {
    imp::get_data_dir()
}

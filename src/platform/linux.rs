// Tagmark platform paths for Linux
// Config: ~/.config/tagmark
// Data:   ~/.local/share/tagmark

use std::env;
use std::path::PathBuf;

fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("tagmark"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            fallback
                .iter()
                .fold(PathBuf::from(home), |path, part| path.join(part))
                .join("tagmark")
        }
    }
}

/// Uses `$XDG_CONFIG_HOME/tagmark` if set, otherwise `~/.config/tagmark`.
pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

/// Uses `$XDG_DATA_HOME/tagmark` if set, otherwise `~/.local/share/tagmark`.
pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

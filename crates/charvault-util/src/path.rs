//! Directory lookup following XDG conventions.

use std::path::PathBuf;

/// Get the charvault configuration directory.
///
/// - `$XDG_CONFIG_HOME/charvault` if set
/// - `~/.config/charvault` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("charvault"))
}

/// Get the charvault data directory, where characters and snapshots live.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("charvault"))
}

/// Get the charvault logs directory.
///
/// Prefers the XDG state directory and falls back to the config directory
/// on platforms without one.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .map(|p| p.join("charvault").join("logs"))
        .or_else(|| config_dir().map(|p| p.join("logs")))
}

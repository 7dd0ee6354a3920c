// LearnHub platform paths
// Resolves where the client keeps its settings on each OS.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "learnhub";

/// Returns the platform-specific configuration directory for LearnHub.
///
/// - **Linux**: `$XDG_CONFIG_HOME/learnhub`, else `~/.config/learnhub`
/// - **macOS**: `~/Library/Application Support/learnhub`
/// - **Windows**: `%APPDATA%/learnhub`
pub fn get_config_dir() -> PathBuf {
    base_config_dir().join(APP_DIR)
}

#[cfg(target_os = "windows")]
fn base_config_dir() -> PathBuf {
    PathBuf::from(
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming")),
    )
}

#[cfg(target_os = "macos")]
fn base_config_dir() -> PathBuf {
    home_dir().join("Library").join("Application Support")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn base_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home_dir().join(".config"),
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

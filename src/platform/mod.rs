// Tabdock platform abstraction
// Per-OS locations for the settings file and the window state database.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod fallback {
    use std::env;
    use std::path::PathBuf;

    pub fn get_config_dir() -> PathBuf {
        PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp"))).join(".tabdock")
    }

    pub fn get_data_dir() -> PathBuf {
        get_config_dir().join("data")
    }
}

/// Configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabdock` or `~/.config/tabdock`
/// - **macOS**: `~/Library/Application Support/Tabdock`
/// - **Windows**: `%APPDATA%/Tabdock`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        fallback::get_config_dir()
    }
}

/// Data directory, home of the window state database.
///
/// - **Linux**: `$XDG_DATA_HOME/tabdock` or `~/.local/share/tabdock`
/// - **macOS**: `~/Library/Application Support/Tabdock/Data`
/// - **Windows**: `%LOCALAPPDATA%/Tabdock`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        fallback::get_data_dir()
    }
}

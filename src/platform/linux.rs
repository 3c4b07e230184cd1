// Tabdock platform paths for Linux
// Config: ~/.config/tabdock
// Data:   ~/.local/share/tabdock

use std::env;
use std::path::PathBuf;

fn xdg_or_home(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("tabdock"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            fallback
                .iter()
                .fold(PathBuf::from(home), |path, part| path.join(part))
                .join("tabdock")
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    xdg_or_home("XDG_CONFIG_HOME", &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_or_home("XDG_DATA_HOME", &[".local", "share"])
}

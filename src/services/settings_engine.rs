// Tabdock Settings Engine
// Loads, saves and edits TabsSettings, stored as JSON at the platform config path.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::TabsSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<TabsSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &TabsSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: TabsSettings,
}

impl SettingsEngine {
    /// Uses `path_override` if given, otherwise `settings.json` in the platform
    /// config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: TabsSettings::default(),
        }
    }
}

/// Walks `parts` into `root` and replaces the value at the end of the path.
/// Only existing keys can be replaced.
fn replace_at_path(root: &mut Value, parts: &[&str], value: Value) -> Result<(), String> {
    let (last, parents) = parts.split_last().ok_or("empty key")?;
    let mut current = root;
    for part in parents {
        current = current
            .get_mut(*part)
            .ok_or_else(|| format!("section '{}' not found", part))?;
    }
    let map = current
        .as_object_mut()
        .ok_or_else(|| format!("'{}' is not inside a section", last))?;
    match map.get_mut(*last) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(format!("key '{}' not found", last)),
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file means defaults; a malformed file is an error.
    fn load(&mut self) -> Result<TabsSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "No settings file, using defaults");
            self.settings = TabsSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &TabsSettings {
        &self.settings
    }

    /// Updates one setting by dot path (`general.select_dropped_tab`,
    /// `event_bus.capacity`, ...) and saves immediately.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let parts: Vec<&str> = key.split('.').collect();

        let mut json = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        replace_at_path(&mut json, &parts, value)
            .map_err(|reason| SettingsError::InvalidKey(format!("{}: {}", key, reason)))?;

        self.settings = serde_json::from_value(json).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = TabsSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

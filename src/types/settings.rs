use serde::{Deserialize, Serialize};

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TabsSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub event_bus: EventBusSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Tab and window behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    /// Rendering mode given to tabs the application creates on its own.
    pub desktop_by_default: bool,
    /// Select the first dropped tab once a drop commits.
    pub select_dropped_tab: bool,
    /// Reopen saved windows on launch.
    pub restore_windows: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            desktop_by_default: false,
            select_dropped_tab: true,
            restore_windows: true,
        }
    }
}

/// Cross-window notice delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventBusSettings {
    /// Notices buffered per subscriber before the slowest one starts missing them.
    pub capacity: usize,
}

impl Default for EventBusSettings {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Where window state is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Database file name, relative to the platform data directory unless absolute.
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "tabdock.db".to_string(),
        }
    }
}

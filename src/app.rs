//! App Core for Tabdock.
//!
//! Holds the process-wide pieces every window shares (settings, window state
//! store, event bus, drag coordinator) and creates, restores and saves windows.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::database::connection::Database;
use crate::managers::tab_collection::TabCollection;
use crate::managers::window_scene::WindowScene;
use crate::managers::window_state_manager::{WindowStateManager, WindowStateManagerTrait};
use crate::platform;
use crate::services::activity_codec::{self, UserActivity};
use crate::services::drag_reconciliation::DragCoordinator;
use crate::services::event_bus::{EventBus, RemovalNotice};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::drag::WindowId;
use crate::types::errors::{AppError, PersistError};
use crate::types::settings::TabsSettings;

pub struct App {
    pub settings_engine: SettingsEngine,
    pub window_states: WindowStateManager,
    pub bus: Arc<EventBus>,
    pub coordinator: Arc<DragCoordinator>,
}

impl App {
    /// Loads settings (from `settings_path` or the platform config dir) and
    /// opens the window state database they point at.
    pub fn new(settings_path: Option<String>) -> Result<Self, AppError> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine.load()?;

        let db_path = {
            let file = PathBuf::from(&settings.storage.database_file);
            if file.is_absolute() {
                file
            } else {
                platform::get_data_dir().join(file)
            }
        };
        let db = Database::open(&db_path)?;
        info!(database = %db_path.display(), "Opened window state database");

        Ok(Self::with_database(settings_engine, Arc::new(db)))
    }

    /// Wires the app around an already loaded settings engine and open database.
    pub fn with_database(settings_engine: SettingsEngine, db: Arc<Database>) -> Self {
        let settings = settings_engine.get_settings().clone();
        let bus = Arc::new(EventBus::new(settings.event_bus.capacity));
        let coordinator = Arc::new(
            DragCoordinator::new(bus.clone())
                .with_dropped_tab_selection(settings.general.select_dropped_tab),
        );

        Self {
            settings_engine,
            window_states: WindowStateManager::new(db),
            bus,
            coordinator,
        }
    }

    pub fn settings(&self) -> &TabsSettings {
        self.settings_engine.get_settings()
    }

    fn desktop_default(&self) -> bool {
        self.settings().general.desktop_by_default
    }

    /// A new window with one blank tab.
    pub fn open_window(&self) -> WindowScene {
        self.open_window_with(TabCollection::new(self.desktop_default()))
    }

    pub fn open_window_with(&self, tabs: TabCollection) -> WindowScene {
        let window = WindowScene::new(WindowId::new(), tabs, self.coordinator.clone());
        info!(window = %window.id(), tabs = window.tabs().count(), "Opened window");
        window
    }

    /// Rebuilds a window from its restoration activity; anything unreadable
    /// gives a blank window.
    pub fn restore_window(&self, activity: &UserActivity) -> WindowScene {
        let tabs = activity_codec::restore_collection_from_activity(activity, self.desktop_default())
            .unwrap_or_else(|| TabCollection::new(self.desktop_default()));
        self.open_window_with(tabs)
    }

    /// Opens a new window around the tab an "open tab in new window" activity
    /// carries, and tells the other windows to let go of it.
    pub fn open_window_for_activity(&self, activity: &UserActivity) -> Option<WindowScene> {
        let tab = activity_codec::restore_tab_from_activity(activity)?;
        let tab_id = tab.id().clone();
        let mut window = self.open_window_with(TabCollection::from_parts(vec![tab], 0, self.desktop_default()));

        let claim = self.coordinator.claim();
        window.record_claim(tab_id.clone(), claim);
        self.bus.publish(RemovalNotice {
            tab_id,
            claimed_by: window.id().clone(),
            claim,
            gesture: None,
        });
        Some(window)
    }

    /// Every saved window, or none when restoring is turned off.
    pub fn restore_windows(&self) -> Result<Vec<WindowScene>, PersistError> {
        if !self.settings().general.restore_windows {
            return Ok(Vec::new());
        }
        let windows = self
            .window_states
            .restore_all(self.desktop_default())?
            .into_iter()
            .map(|(id, tabs)| WindowScene::new(id, tabs, self.coordinator.clone()))
            .collect::<Vec<_>>();
        info!(windows = windows.len(), "Restored windows");
        Ok(windows)
    }

    pub fn save_window(&self, window: &WindowScene) -> Result<(), PersistError> {
        self.window_states.save_window(window.id(), window.tabs())
    }

    /// Closing a window discards its saved state.
    pub fn close_window(&self, window: WindowScene) -> Result<(), PersistError> {
        info!(window = %window.id(), "Closed window");
        self.window_states.forget_window(window.id())
    }

    /// Applies pending notices and saves every window.
    pub fn shutdown(&self, windows: &mut [WindowScene]) -> Result<(), PersistError> {
        for gesture in self.coordinator.in_flight() {
            warn!(%gesture, "Drag never torn down; its tabs stay with the source window");
        }
        for window in windows.iter_mut() {
            window.process_notices();
            self.save_window(window)?;
        }
        Ok(())
    }
}

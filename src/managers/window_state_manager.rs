//! Window state persistence for Tabdock.
//!
//! Each window's tab collection is stored as its encoded property map (JSON
//! text) in SQLite, one row per window. Rows that no longer decode restore as
//! a blank window instead of failing.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tracing::{debug, warn};

use crate::database::connection::Database;
use crate::managers::tab_collection::TabCollection;
use crate::services::activity_codec::{self, PropertyMap};
use crate::types::drag::WindowId;
use crate::types::errors::PersistError;

/// Trait defining window state persistence.
pub trait WindowStateManagerTrait {
    fn save_window(&self, window_id: &WindowId, tabs: &TabCollection) -> Result<(), PersistError>;
    fn restore_window(&self, window_id: &WindowId, desktop_default: bool) -> Result<Option<TabCollection>, PersistError>;
    fn restore_all(&self, desktop_default: bool) -> Result<Vec<(WindowId, TabCollection)>, PersistError>;
    fn forget_window(&self, window_id: &WindowId) -> Result<(), PersistError>;
    fn has_saved_windows(&self) -> bool;
}

/// Window state store backed by SQLite.
pub struct WindowStateManager {
    db: Arc<Database>,
}

impl WindowStateManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn decode_state(window_id: &str, state: &str, desktop_default: bool) -> TabCollection {
        match serde_json::from_str::<PropertyMap>(state) {
            Ok(map) => activity_codec::restore_collection(&map, desktop_default),
            Err(e) => {
                warn!(window = window_id, error = %e, "Stored window state is not a property map");
                TabCollection::new(desktop_default)
            }
        }
    }
}

impl WindowStateManagerTrait for WindowStateManager {
    /// Upserts the encoded collection for `window_id`.
    fn save_window(&self, window_id: &WindowId, tabs: &TabCollection) -> Result<(), PersistError> {
        let state = serde_json::to_string(&Value::Object(activity_codec::encode_collection(tabs)))
            .map_err(|e| PersistError::SerializationError(e.to_string()))?;

        self.db.connection().execute(
            "INSERT INTO window_states (window_id, state, tab_count, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(window_id) DO UPDATE SET state = excluded.state, tab_count = excluded.tab_count, updated_at = excluded.updated_at",
            params![window_id.as_str(), state, tabs.count() as i64, Self::now()],
        )?;
        debug!(window = %window_id, tabs = tabs.count(), "Saved window state");
        Ok(())
    }

    fn restore_window(&self, window_id: &WindowId, desktop_default: bool) -> Result<Option<TabCollection>, PersistError> {
        let state: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT state FROM window_states WHERE window_id = ?1",
                params![window_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(state.map(|s| Self::decode_state(window_id.as_str(), &s, desktop_default)))
    }

    /// All saved windows, least recently updated first.
    fn restore_all(&self, desktop_default: bool) -> Result<Vec<(WindowId, TabCollection)>, PersistError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT window_id, state FROM window_states ORDER BY updated_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let window_id: String = row.get(0)?;
            let state: String = row.get(1)?;
            Ok((window_id, state))
        })?;

        let mut windows = Vec::new();
        for row in rows {
            let (window_id, state) = row?;
            let tabs = Self::decode_state(&window_id, &state, desktop_default);
            windows.push((WindowId::from(window_id), tabs));
        }
        Ok(windows)
    }

    fn forget_window(&self, window_id: &WindowId) -> Result<(), PersistError> {
        self.db.connection().execute(
            "DELETE FROM window_states WHERE window_id = ?1",
            params![window_id.as_str()],
        )?;
        Ok(())
    }

    fn has_saved_windows(&self) -> bool {
        self.db
            .connection()
            .query_row("SELECT COUNT(*) FROM window_states", [], |row| row.get::<_, i64>(0))
            .unwrap_or(0)
            > 0
    }
}

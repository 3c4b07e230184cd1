use std::fmt;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::types::errors::TabError;
use crate::types::tab::{Link, TabId, TabRecord};

/// Receives a callback whenever a tab's attributes change through the collection.
pub trait TabObserver: Send + Sync {
    fn did_change(&self, tab: &TabRecord);
}

/// Ordered tabs of one window with a current-selection cursor.
///
/// Never durably empty: every path that could leave it empty puts a fresh blank
/// tab back. `current_index` always points at an existing tab and no two tabs
/// share an id.
pub struct TabCollection {
    tabs: Vec<TabRecord>,
    current_index: usize,
    desktop_default: bool,
    observers: Vec<Weak<dyn TabObserver>>,
}

impl TabCollection {
    /// A collection holding one blank tab.
    pub fn new(desktop_default: bool) -> Self {
        Self {
            tabs: vec![TabRecord::blank(desktop_default)],
            current_index: 0,
            desktop_default,
            observers: Vec::new(),
        }
    }

    /// Builds a collection from restored parts.
    ///
    /// An empty list becomes one blank tab, duplicate ids keep their first
    /// occurrence and an out-of-range index falls back to 0. The cursor stays
    /// on the tab it pointed at before duplicates were dropped.
    pub fn from_parts(tabs: Vec<TabRecord>, current_index: usize, desktop_default: bool) -> Self {
        let selected = tabs.get(current_index).map(|t| t.id().clone());
        let mut unique: Vec<TabRecord> = Vec::with_capacity(tabs.len());
        for tab in tabs {
            if unique.iter().all(|t| t.id() != tab.id()) {
                unique.push(tab);
            }
        }
        if unique.is_empty() {
            return Self::new(desktop_default);
        }
        let current_index = selected
            .and_then(|id| unique.iter().position(|t| *t.id() == id))
            .unwrap_or(0);
        Self {
            tabs: unique,
            current_index,
            desktop_default,
            observers: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_tab(&self) -> &TabRecord {
        &self.tabs[self.current_index]
    }

    pub fn get(&self, index: usize) -> Option<&TabRecord> {
        self.tabs.get(index)
    }

    pub fn tabs(&self) -> &[TabRecord] {
        &self.tabs
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id().clone()).collect()
    }

    pub fn desktop_default(&self) -> bool {
        self.desktop_default
    }

    pub fn index_of(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    pub fn contains(&self, id: &TabId) -> bool {
        self.index_of(id).is_some()
    }

    /// True if some tab was opened but never shown.
    pub fn has_unread(&self) -> bool {
        self.tabs.iter().any(|t| !t.viewed)
    }

    /// True unless the window is down to a single blank tab.
    pub fn has_active_tabs(&self) -> bool {
        self.tabs.len() > 1 || self.tabs.last().is_some_and(|t| t.link.is_some())
    }

    pub fn select(&mut self, index: usize) {
        if index >= self.tabs.len() {
            debug!(index, count = self.tabs.len(), "Ignoring out-of-bounds select");
            return;
        }
        self.current_index = index;
    }

    pub fn select_tab(&mut self, id: &TabId) -> Result<(), TabError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| TabError::NotFound(id.to_string()))?;
        self.current_index = index;
        Ok(())
    }

    /// Appends a tab and makes it current. A tab already present is just selected.
    pub fn add(&mut self, tab: TabRecord) {
        if let Some(existing) = self.index_of(tab.id()) {
            debug!(tab_id = %tab.id(), "Tab already present, selecting it");
            self.current_index = existing;
            return;
        }
        self.tabs.push(tab);
        self.current_index = self.tabs.len() - 1;
    }

    /// Inserts at `index` clamped to `[0, count]`; the cursor keeps pointing at
    /// the same tab. A tab already present is relocated instead.
    pub fn insert(&mut self, tab: TabRecord, index: usize) {
        if let Some(existing) = self.index_of(tab.id()) {
            debug!(tab_id = %tab.id(), "Tab already present, relocating it");
            let to = index.min(self.tabs.len() - 1);
            self.move_tab(existing, to);
            return;
        }
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, tab);
        if index <= self.current_index {
            self.current_index += 1;
        }
    }

    /// Removes the tab at `index` and returns it.
    ///
    /// Removing the last tab leaves a fresh blank tab selected.
    pub fn remove(&mut self, index: usize) -> Option<TabRecord> {
        if index >= self.tabs.len() {
            debug!(index, count = self.tabs.len(), "Ignoring out-of-bounds remove");
            return None;
        }
        let removed = self.tabs.remove(index);

        if self.tabs.is_empty() {
            self.tabs.push(TabRecord::blank(self.desktop_default));
            self.current_index = 0;
            return Some(removed);
        }

        if self.current_index > 0 && index <= self.current_index {
            self.current_index -= 1;
        }
        Some(removed)
    }

    /// Removes by identity. Absent ids are not an error: nothing changes.
    pub fn remove_tab(&mut self, id: &TabId) -> Option<TabRecord> {
        let index = self.index_of(id)?;
        self.remove(index)
    }

    pub fn remove_tabs<'a, I>(&mut self, ids: I) -> Vec<TabRecord>
    where
        I: IntoIterator<Item = &'a TabId>,
    {
        ids.into_iter().filter_map(|id| self.remove_tab(id)).collect()
    }

    /// Relocates a tab. Out-of-bounds requests are ignored; the cursor follows
    /// the previously current tab by identity.
    pub fn move_tab(&mut self, from: usize, to: usize) {
        let count = self.tabs.len();
        if from >= count || to >= count {
            debug!(from, to, count, "Ignoring out-of-bounds move");
            return;
        }
        let previously_current = self.tabs[self.current_index].id().clone();
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        self.current_index = self.index_of(&previously_current).unwrap_or(0);
    }

    /// Drops every tab and starts over with one blank tab.
    pub fn clear_all(&mut self) {
        self.tabs.clear();
        self.tabs.push(TabRecord::blank(self.desktop_default));
        self.current_index = 0;
    }

    pub fn set_link(&mut self, index: usize, link: Option<Link>) -> Result<(), TabError> {
        self.update(index, |tab| tab.link = link)
    }

    pub fn mark_viewed(&mut self, index: usize, viewed: bool) -> Result<(), TabError> {
        self.update(index, |tab| tab.viewed = viewed)
    }

    pub fn toggle_desktop_mode(&mut self, index: usize) -> Result<(), TabError> {
        self.update(index, TabRecord::toggle_desktop_mode)
    }

    fn update<F>(&mut self, index: usize, change: F) -> Result<(), TabError>
    where
        F: FnOnce(&mut TabRecord),
    {
        let tab = self.tabs.get_mut(index).ok_or(TabError::InvalidIndex(index))?;
        change(tab);
        let snapshot = tab.clone();
        self.notify_observers(&snapshot);
        Ok(())
    }

    /// Registers an observer without keeping it alive. Registering twice is a no-op.
    pub fn add_observer(&mut self, observer: &Arc<dyn TabObserver>) {
        self.prune_observers();
        let weak = Arc::downgrade(observer);
        if !self.observers.iter().any(|o| o.ptr_eq(&weak)) {
            self.observers.push(weak);
        }
    }

    pub fn remove_observer(&mut self, observer: &Arc<dyn TabObserver>) {
        let weak = Arc::downgrade(observer);
        self.observers.retain(|o| !o.ptr_eq(&weak));
        self.prune_observers();
    }

    pub fn observer_count(&mut self) -> usize {
        self.prune_observers();
        self.observers.len()
    }

    fn notify_observers(&mut self, tab: &TabRecord) {
        for observer in self.observers.iter().filter_map(Weak::upgrade) {
            observer.did_change(tab);
        }
        self.prune_observers();
    }

    fn prune_observers(&mut self) {
        self.observers.retain(|o| o.strong_count() > 0);
    }
}

impl fmt::Debug for TabCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabCollection")
            .field("tabs", &self.tabs)
            .field("current_index", &self.current_index)
            .field("desktop_default", &self.desktop_default)
            .field("observers", &self.observers.len())
            .finish()
    }
}

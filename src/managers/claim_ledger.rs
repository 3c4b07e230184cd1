//! Per-window record of the claims that brought tabs in.
//!
//! A window may release a tab only to a claim newer than the one it holds the
//! tab under. Removal notices and gesture teardown both go through
//! [`ClaimLedger::release`], so neither can undo a later move back into this
//! window, however late it arrives.

use std::collections::HashMap;

use tracing::debug;

use crate::managers::tab_collection::TabCollection;
use crate::types::drag::ClaimStamp;
use crate::types::tab::TabId;

#[derive(Debug, Default)]
pub struct ClaimLedger {
    stamps: HashMap<TabId, ClaimStamp>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the newer stamp when the tab is already recorded.
    pub fn record(&mut self, tab: TabId, stamp: ClaimStamp) {
        let held = self.stamps.entry(tab).or_insert(stamp);
        if stamp > *held {
            *held = stamp;
        }
    }

    pub fn stamp_of(&self, tab: &TabId) -> Option<ClaimStamp> {
        self.stamps.get(tab).copied()
    }

    /// Whether a claim stamped `stamp` overrides this window's hold on `tab`.
    /// A tab that never arrived through a claim yields to any claim.
    pub fn is_superseded_by(&self, tab: &TabId, stamp: ClaimStamp) -> bool {
        self.stamps.get(tab).map_or(true, |held| stamp > *held)
    }

    /// Removes `tab` from `tabs` if `stamp` supersedes this window's hold on it.
    pub fn release(&mut self, tabs: &mut TabCollection, tab: &TabId, stamp: ClaimStamp) -> bool {
        if !self.is_superseded_by(tab, stamp) {
            debug!(tab_id = %tab, %stamp, "Ignoring stale claim");
            return false;
        }
        self.stamps.remove(tab);
        tabs.remove_tab(tab).is_some()
    }

    /// Forgets tabs that are no longer in `tabs`.
    pub fn prune(&mut self, tabs: &TabCollection) {
        self.stamps.retain(|id, _| tabs.contains(id));
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

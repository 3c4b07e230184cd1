//! One application window.
//!
//! Owns a tab collection and an inbox on the event bus, and exposes the drag
//! and drop callbacks the presentation layer forwards from the platform. All
//! mutation happens on the window's own thread; other windows are reached only
//! through the shared [`DragCoordinator`] and the bus.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::managers::claim_ledger::ClaimLedger;
use crate::managers::tab_collection::TabCollection;
use crate::services::activity_codec::{self, UserActivity};
use crate::services::drag_reconciliation::DragCoordinator;
use crate::services::event_bus::{Inbox, RemovalNotice};
use crate::types::drag::{ClaimStamp, DragItem, DropOutcome, DropSession, GestureId, GestureState, WindowId};
use crate::types::tab::{TabId, TabRecord};

pub struct WindowScene {
    id: WindowId,
    tabs: TabCollection,
    coordinator: Arc<DragCoordinator>,
    inbox: Inbox,
    /// Claim under which each tab arrived; only tabs still here.
    claims: ClaimLedger,
    open_gestures: HashSet<GestureId>,
}

impl WindowScene {
    pub fn new(id: WindowId, tabs: TabCollection, coordinator: Arc<DragCoordinator>) -> Self {
        let inbox = coordinator.bus().inbox();
        Self {
            id,
            tabs,
            coordinator,
            inbox,
            claims: ClaimLedger::new(),
            open_gestures: HashSet::new(),
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn tabs(&self) -> &TabCollection {
        &self.tabs
    }

    /// Direct access to the collection. Claims on tabs removed through it are
    /// forgotten at the next drop, teardown or notice drain.
    pub fn tabs_mut(&mut self) -> &mut TabCollection {
        &mut self.tabs
    }

    /// Closes the tab at `index`.
    pub fn close_tab(&mut self, index: usize) -> Option<TabRecord> {
        let closed = self.tabs.remove(index);
        self.claims.prune(&self.tabs);
        closed
    }

    /// Records that `tab` arrived here under `stamp`.
    pub fn record_claim(&mut self, tab: TabId, stamp: ClaimStamp) {
        if self.tabs.contains(&tab) {
            self.claims.record(tab, stamp);
        }
    }

    pub fn claim_of(&self, tab: &TabId) -> Option<ClaimStamp> {
        self.claims.stamp_of(tab)
    }

    /// Tabs this window currently holds under a claim.
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// A drag starts on the tab at `index`.
    pub fn items_for_beginning(&mut self, index: usize) -> Option<DragItem> {
        let item = self.coordinator.begin(&self.id, &self.tabs, index)?;
        if let Some(gesture) = item.gesture {
            self.open_gestures.insert(gesture);
        }
        Some(item)
    }

    /// The tab at `index` joins a drag already in progress.
    pub fn items_for_adding(&mut self, gesture: Option<GestureId>, index: usize) -> Option<DragItem> {
        self.coordinator.extend(gesture, &self.id, &self.tabs, index)
    }

    /// A drop lands in this window.
    pub fn perform_drop(&mut self, destination_index: Option<usize>, session: &DropSession) -> DropOutcome {
        let outcome = self
            .coordinator
            .commit_drop(&self.id, &mut self.tabs, destination_index, session);
        if let Some(stamp) = outcome.claim {
            for id in &outcome.accepted {
                self.claims.record(id.clone(), stamp);
            }
        }
        self.claims.prune(&self.tabs);
        outcome
    }

    /// The platform tore down a drag that started in this window.
    pub fn drag_session_did_end(&mut self, gesture: GestureId) -> GestureState {
        self.open_gestures.remove(&gesture);
        let state = self.coordinator.end(gesture, &self.id, &mut self.tabs, &mut self.claims);
        self.claims.prune(&self.tabs);
        state
    }

    /// True while a drag started here has not been torn down.
    pub fn drag_in_flight(&self) -> bool {
        !self.open_gestures.is_empty()
    }

    /// Applies every pending removal notice. Returns the tabs actually removed.
    pub fn process_notices(&mut self) -> Vec<TabId> {
        let notices = self.inbox.drain();
        let released = notices
            .iter()
            .filter(|notice| self.apply_notice(notice))
            .map(|notice| notice.tab_id.clone())
            .collect();
        self.claims.prune(&self.tabs);
        released
    }

    /// Removes the claimed tab if this window still holds it.
    ///
    /// Ignores its own notices and claims no newer than the one that brought
    /// the tab here. Repeated delivery is harmless.
    pub fn apply_notice(&mut self, notice: &RemovalNotice) -> bool {
        if notice.claimed_by == self.id {
            return false;
        }
        if !self.claims.release(&mut self.tabs, &notice.tab_id, notice.claim) {
            return false;
        }
        info!(
            window = %self.id,
            tab_id = %notice.tab_id,
            claimed_by = %notice.claimed_by,
            claim = %notice.claim,
            "Released tab claimed elsewhere"
        );
        true
    }

    /// Activity the platform keeps to restore this window.
    pub fn user_activity(&self) -> UserActivity {
        activity_codec::collection_activity(&self.tabs)
    }

    /// Activity for dragging the tab at `index` out into a new window.
    pub fn open_tab_activity(&self, index: usize) -> Option<UserActivity> {
        self.tabs.get(index).map(activity_codec::tab_activity)
    }
}

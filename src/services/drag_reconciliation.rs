//! Drag reconciliation for Tabdock.
//!
//! Keeps "every tab lives in exactly one window" true while tabs are dragged
//! around. A gesture runs through four phases:
//!
//! 1. [`DragCoordinator::begin`] in the source window allocates a context.
//! 2. [`DragCoordinator::extend`] adds more items to the same gesture.
//! 3. [`DragCoordinator::commit_drop`] in the destination either reorders in
//!    place or claims the tab under a fresh [`ClaimStamp`] and records it as
//!    foreign-accepted.
//! 4. [`DragCoordinator::end`] in the source detaches foreign-accepted tabs.
//!
//! Phases 3 and 4 may arrive in either order, and a teardown may arrive after
//! later gestures moved the same tab again. Ownership changes only on explicit
//! flags: the destination commits once, the source releases once, and only to
//! a claim newer than its own. A committed transfer also publishes a removal
//! notice, so a source whose teardown already ran still lets go of the tab
//! when it drains its inbox.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::managers::claim_ledger::ClaimLedger;
use crate::managers::tab_collection::TabCollection;
use crate::services::event_bus::{EventBus, RemovalNotice};
use crate::types::drag::{
    ClaimStamp, DragItem, DropOperation, DropOutcome, DropPayload, DropSession, GestureId,
    GestureState, WindowId,
};
use crate::types::tab::{TabId, TabRecord};

/// Per-gesture bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct DragReconciliationContext {
    source_window: WindowId,
    source_indices: Vec<usize>,
    dragged_tabs: Vec<TabId>,
    completed: bool,
    is_reorder: bool,
    foreign_accepted: Vec<(TabId, ClaimStamp)>,
}

impl DragReconciliationContext {
    pub fn new(source_window: WindowId, source_index: usize, tab: TabId) -> Self {
        Self {
            source_window,
            source_indices: vec![source_index],
            dragged_tabs: vec![tab],
            completed: false,
            is_reorder: false,
            foreign_accepted: Vec::new(),
        }
    }

    pub fn add_source(&mut self, index: usize, tab: TabId) {
        if !self.source_indices.contains(&index) {
            self.source_indices.push(index);
        }
        if !self.dragged_tabs.contains(&tab) {
            self.dragged_tabs.push(tab);
        }
    }

    pub fn accept_foreign(&mut self, tab: TabId, stamp: ClaimStamp) {
        match self.foreign_accepted.iter_mut().find(|(id, _)| *id == tab) {
            Some((_, held)) => *held = (*held).max(stamp),
            None => self.foreign_accepted.push((tab, stamp)),
        }
    }

    pub fn mark_reorder(&mut self) {
        self.is_reorder = true;
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn source_window(&self) -> &WindowId {
        &self.source_window
    }

    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    pub fn dragged_tabs(&self) -> &[TabId] {
        &self.dragged_tabs
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_reorder(&self) -> bool {
        self.is_reorder
    }

    pub fn foreign_accepted_tabs(&self) -> Vec<TabId> {
        self.foreign_accepted.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Foreign-accepted tabs with the claim each was taken under.
    pub fn foreign_claims(&self) -> &[(TabId, ClaimStamp)] {
        &self.foreign_accepted
    }

    /// Only a committed, non-reorder gesture detaches anything from the source.
    pub fn should_detach(&self) -> bool {
        self.completed && !self.is_reorder
    }

    pub fn state(&self) -> GestureState {
        match (self.completed, self.is_reorder) {
            (false, _) => GestureState::Active,
            (true, true) => GestureState::CommittedReorder,
            (true, false) => GestureState::CommittedTransfer,
        }
    }
}

/// Owns every live drag context, keyed by gesture, and runs the four phases.
///
/// Shared by all windows of the process; each phase only touches the one
/// collection handed to it.
pub struct DragCoordinator {
    sessions: Mutex<HashMap<GestureId, DragReconciliationContext>>,
    next_gesture: AtomicU64,
    next_claim: AtomicU64,
    bus: Arc<EventBus>,
    select_dropped_tab: bool,
}

impl DragCoordinator {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_gesture: AtomicU64::new(1),
            next_claim: AtomicU64::new(1),
            bus,
            select_dropped_tab: true,
        }
    }

    /// Whether a committed drop selects the first dropped tab in the destination.
    pub fn with_dropped_tab_selection(mut self, select: bool) -> Self {
        self.select_dropped_tab = select;
        self
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Draws the next claim stamp. Stamps only ever grow.
    pub fn claim(&self) -> ClaimStamp {
        ClaimStamp(self.next_claim.fetch_add(1, Ordering::Relaxed))
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<GestureId, DragReconciliationContext>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Phase 1: lift the tab at `index` out of `source`.
    ///
    /// The tab stays in `source`; only its identity is recorded.
    pub fn begin(&self, source_window: &WindowId, source: &TabCollection, index: usize) -> Option<DragItem> {
        let Some(tab) = source.get(index) else {
            debug!(index, "Drag began on a missing tab");
            return None;
        };
        let gesture = GestureId(self.next_gesture.fetch_add(1, Ordering::Relaxed));
        let context = DragReconciliationContext::new(source_window.clone(), index, tab.id().clone());
        self.sessions().insert(gesture, context);
        debug!(%gesture, window = %source_window, tab_id = %tab.id(), "Drag began");

        Some(DragItem {
            gesture: Some(gesture),
            source_window: source_window.clone(),
            source_index: index,
            tab: tab.clone(),
        })
    }

    /// Phase 2: add the tab at `index` to an already running gesture.
    ///
    /// Without a matching context the item travels on its own and is released
    /// from the source through the event bus once some destination claims it.
    pub fn extend(
        &self,
        gesture: Option<GestureId>,
        source_window: &WindowId,
        source: &TabCollection,
        index: usize,
    ) -> Option<DragItem> {
        let tab = source.get(index)?;
        let mut sessions = self.sessions();
        let context = gesture
            .and_then(|g| sessions.get_mut(&g))
            .filter(|ctx| ctx.source_window() == source_window);

        match context {
            Some(ctx) => ctx.add_source(index, tab.id().clone()),
            None => debug!(?gesture, tab_id = %tab.id(), "No drag context, item travels independently"),
        }

        Some(DragItem {
            gesture,
            source_window: source_window.clone(),
            source_index: index,
            tab: tab.clone(),
        })
    }

    /// Phase 3: apply a drop to `destination`.
    ///
    /// `destination_index` of `None` means "after the last tab".
    pub fn commit_drop(
        &self,
        destination_window: &WindowId,
        destination: &mut TabCollection,
        destination_index: Option<usize>,
        session: &DropSession,
    ) -> DropOutcome {
        let base = destination_index
            .unwrap_or(destination.count())
            .min(destination.count());

        let (outcome, first_dropped) = match session.operation() {
            DropOperation::Copy => self.copy_items(destination, base, session),
            DropOperation::Move => self.move_items(destination_window, destination, base, session),
        };

        if self.select_dropped_tab {
            if let Some(id) = first_dropped {
                if destination.select_tab(&id).is_err() {
                    debug!(tab_id = %id, "Dropped tab no longer present, selection unchanged");
                }
            }
        }
        outcome
    }

    fn copy_items(
        &self,
        destination: &mut TabCollection,
        base: usize,
        session: &DropSession,
    ) -> (DropOutcome, Option<TabId>) {
        let mut outcome = DropOutcome::default();
        for (offset, item) in session.items.iter().enumerate() {
            let tab = match &item.payload {
                Some(DropPayload::ExternalLink(link)) => {
                    TabRecord::with_link(link.clone(), destination.desktop_default())
                }
                // Another process's tab: same page, new identity.
                Some(DropPayload::InAppTab(tab)) => {
                    TabRecord::with_id(TabId::new(), tab.link.clone(), true, tab.is_desktop)
                }
                None => continue,
            };
            outcome.inserted.push(tab.id().clone());
            destination.insert(tab, base + offset);
        }
        info!(inserted = outcome.inserted.len(), "Copied dropped content into new tabs");
        let first = outcome.inserted.first().cloned();
        (outcome, first)
    }

    fn move_items(
        &self,
        destination_window: &WindowId,
        destination: &mut TabCollection,
        base: usize,
        session: &DropSession,
    ) -> (DropOutcome, Option<TabId>) {
        let mut outcome = DropOutcome::default();
        let mut first_dropped = None;
        let mut notices = Vec::new();
        let mut claim = None;

        {
            let mut sessions = self.sessions();
            let mut context = session.gesture.and_then(|g| sessions.get_mut(&g));
            if context.is_none() {
                debug!(gesture = ?session.gesture, "Drop without a live drag context");
            }

            for (offset, item) in session.items.iter().enumerate() {
                let target = base + offset;
                let last = destination.count() - 1;

                match &item.payload {
                    Some(DropPayload::InAppTab(tab))
                        if item.source_index.is_some() && destination.contains(tab.id()) =>
                    {
                        // Earlier items of the same drop may have shifted positions,
                        // so the tab is found by identity.
                        if let Some(from) = destination.index_of(tab.id()) {
                            destination.move_tab(from, target.min(last));
                        }
                        outcome.reordered += 1;
                        if let Some(ctx) = context.as_deref_mut() {
                            ctx.mark_reorder();
                        }
                        first_dropped = first_dropped.or_else(|| Some(tab.id().clone()));
                    }
                    Some(DropPayload::InAppTab(tab)) => {
                        // A claim. The tab may still be here while a release is
                        // pending; it is relocated instead of duplicated.
                        let stamp = *claim.get_or_insert_with(|| self.claim());
                        match destination.index_of(tab.id()) {
                            Some(from) => destination.move_tab(from, target.min(last)),
                            None => destination.insert(tab.clone(), target),
                        }
                        outcome.accepted.push(tab.id().clone());
                        if let Some(ctx) = context.as_deref_mut() {
                            ctx.accept_foreign(tab.id().clone(), stamp);
                        }
                        notices.push(RemovalNotice {
                            tab_id: tab.id().clone(),
                            claimed_by: destination_window.clone(),
                            claim: stamp,
                            gesture: session.gesture,
                        });
                        first_dropped = first_dropped.or_else(|| Some(tab.id().clone()));
                    }
                    Some(DropPayload::ExternalLink(link)) => {
                        let tab = TabRecord::with_link(link.clone(), destination.desktop_default());
                        outcome.inserted.push(tab.id().clone());
                        first_dropped = first_dropped.or_else(|| Some(tab.id().clone()));
                        destination.insert(tab, target);
                    }
                    None => match item.source_index {
                        Some(from) => {
                            let moving = destination.get(from).map(|t| t.id().clone());
                            destination.move_tab(from, target.min(last));
                            outcome.reordered += 1;
                            if let Some(ctx) = context.as_deref_mut() {
                                ctx.mark_reorder();
                            }
                            first_dropped = first_dropped.or(moving);
                        }
                        None => debug!(offset, "Dropped item carried no payload"),
                    },
                }
            }

            if let Some(ctx) = context {
                ctx.mark_completed();
            }
        }

        for notice in notices {
            self.bus.publish(notice);
        }
        outcome.claim = claim;

        if !outcome.accepted.is_empty() {
            info!(
                gesture = ?session.gesture,
                window = %destination_window,
                accepted = outcome.accepted.len(),
                claim = ?outcome.claim,
                "Took over tabs from another window"
            );
        } else if outcome.reordered > 0 {
            info!(gesture = ?session.gesture, moved = outcome.reordered, "Reordered tabs");
        }
        (outcome, first_dropped)
    }

    /// Phase 4: tear the gesture down in the source window.
    ///
    /// Each foreign-accepted tab is released through `claims`, so a tab that has
    /// come back to the source under a newer claim stays. Ending an unknown or
    /// already-ended gesture changes nothing.
    pub fn end(
        &self,
        gesture: GestureId,
        source_window: &WindowId,
        source: &mut TabCollection,
        claims: &mut ClaimLedger,
    ) -> GestureState {
        let context = {
            let mut sessions = self.sessions();
            if let Some(ctx) = sessions.get(&gesture) {
                if ctx.source_window() != source_window {
                    warn!(%gesture, window = %source_window, "Gesture ended from a window that did not start it");
                    return ctx.state();
                }
            }
            sessions.remove(&gesture)
        };

        let Some(context) = context else {
            debug!(%gesture, "Ending a gesture with no context");
            return GestureState::Cancelled;
        };

        if context.should_detach() {
            let detached = context
                .foreign_claims()
                .iter()
                .filter(|(id, stamp)| claims.release(source, id, *stamp))
                .count();
            info!(%gesture, detached, "Released tabs claimed by another window");
            GestureState::CommittedTransfer
        } else if context.is_completed() {
            GestureState::CommittedReorder
        } else {
            debug!(%gesture, "Drag cancelled");
            GestureState::Cancelled
        }
    }

    /// State of a gesture that has not been torn down yet.
    pub fn state(&self, gesture: GestureId) -> Option<GestureState> {
        self.sessions().get(&gesture).map(DragReconciliationContext::state)
    }

    pub fn context(&self, gesture: GestureId) -> Option<DragReconciliationContext> {
        self.sessions().get(&gesture).cloned()
    }

    /// Gestures begun but never torn down. Their tabs stay with the source
    /// indefinitely if the platform never delivers the teardown.
    pub fn in_flight(&self) -> Vec<GestureId> {
        let mut gestures: Vec<GestureId> = self.sessions().keys().copied().collect();
        gestures.sort();
        gestures
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tab::{Link, TabId, TabRecord};

/// Identifies one window (scene) of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WindowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies one drag gesture. Allocated in increasing order by the coordinator,
/// so a later gesture always compares greater than an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GestureId(pub u64);

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gesture-{}", self.0)
    }
}

/// Orders ownership claims. Every drop that takes a tab into a window, and
/// every window opened around a single tab, draws the next stamp; the newest
/// claim on a tab wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimStamp(pub u64);

impl fmt::Display for ClaimStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim-{}", self.0)
    }
}

/// A tab lifted out of a window at the start of (or during) a drag.
#[derive(Debug, Clone)]
pub struct DragItem {
    pub gesture: Option<GestureId>,
    pub source_window: WindowId,
    pub source_index: usize,
    pub tab: TabRecord,
}

impl DragItem {
    /// What the platform hands to `destination` when this item is dropped there.
    ///
    /// Positional provenance only survives when the drop lands in the window the
    /// drag started from.
    pub fn drop_item_for(&self, destination: &WindowId) -> DropItem {
        DropItem {
            source_index: (destination == &self.source_window).then_some(self.source_index),
            payload: Some(DropPayload::InAppTab(self.tab.clone())),
        }
    }
}

/// Content carried by a dropped item, resolved once at drop time.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    InAppTab(TabRecord),
    ExternalLink(Link),
}

impl DropPayload {
    pub fn tab_id(&self) -> Option<&TabId> {
        match self {
            DropPayload::InAppTab(tab) => Some(tab.id()),
            DropPayload::ExternalLink(_) => None,
        }
    }
}

/// One item of a drop as reported by the destination's drop callback.
#[derive(Debug, Clone)]
pub struct DropItem {
    pub source_index: Option<usize>,
    pub payload: Option<DropPayload>,
}

impl DropItem {
    pub fn external(link: Link) -> Self {
        Self {
            source_index: None,
            payload: Some(DropPayload::ExternalLink(link)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOperation {
    /// The drag started inside this process: tabs change owner.
    Move,
    /// The drag came from elsewhere: new tabs are created.
    Copy,
}

/// Everything a destination window learns about an incoming drop.
#[derive(Debug, Clone)]
pub struct DropSession {
    pub gesture: Option<GestureId>,
    pub is_same_process_session: bool,
    pub items: Vec<DropItem>,
}

impl DropSession {
    pub fn local(gesture: Option<GestureId>, items: Vec<DropItem>) -> Self {
        Self {
            gesture,
            is_same_process_session: true,
            items,
        }
    }

    pub fn external(items: Vec<DropItem>) -> Self {
        Self {
            gesture: None,
            is_same_process_session: false,
            items,
        }
    }

    pub fn operation(&self) -> DropOperation {
        if self.is_same_process_session {
            DropOperation::Move
        } else {
            DropOperation::Copy
        }
    }
}

/// Where a gesture stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Active,
    CommittedReorder,
    CommittedTransfer,
    Cancelled,
}

/// What a drop did to the destination collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropOutcome {
    /// Items moved within the destination.
    pub reordered: usize,
    /// In-app tabs claimed by this drop. A tab still here while its release
    /// is pending is relocated and claimed as well.
    pub accepted: Vec<TabId>,
    /// Brand-new tabs created from copied content.
    pub inserted: Vec<TabId>,
    /// Stamp of the claim on `accepted`, when there are any.
    pub claim: Option<ClaimStamp>,
}

impl DropOutcome {
    pub fn is_empty(&self) -> bool {
        self.reordered == 0 && self.accepted.is_empty() && self.inserted.is_empty()
    }
}

//! Cross-window event bus for Tabdock.
//!
//! Best-effort broadcast of "this tab now belongs to another window" notices.
//! Built on `tokio::sync::broadcast`: a subscriber that falls behind by more
//! than the configured capacity misses notices, and subscribers that join after
//! a publish never see it. Consumers must treat every notice as idempotent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::types::drag::{ClaimStamp, GestureId, WindowId};
use crate::types::errors::BusError;
use crate::types::tab::TabId;

/// "Remove `tab_id`, it has been claimed by `claimed_by`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalNotice {
    pub tab_id: TabId,
    pub claimed_by: WindowId,
    /// Orders this claim against others on the same tab.
    pub claim: ClaimStamp,
    /// Gesture that moved the tab, if it moved by drag.
    pub gesture: Option<GestureId>,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Process-wide relay of removal notices. Holds no notice state of its own.
pub struct EventBus {
    sender: broadcast::Sender<RemovalNotice>,
    handlers: Mutex<HashMap<u64, JoinHandle<()>>>,
    next_subscription: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            handlers: Mutex::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Fire-and-forget. Returns how many live receivers the notice reached.
    pub fn publish(&self, notice: RemovalNotice) -> usize {
        trace!(tab_id = %notice.tab_id, claimed_by = %notice.claimed_by, claim = %notice.claim, "Publishing removal notice");
        match self.sender.send(notice) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Removal notice published with no subscribers");
                0
            }
        }
    }

    /// A pollable receiver for a window's own event loop.
    pub fn inbox(&self) -> Inbox {
        Inbox {
            receiver: self.sender.subscribe(),
        }
    }

    /// Runs `handler` on a runtime task for every notice published from now on.
    pub fn subscribe<F>(&self, mut handler: F) -> Result<SubscriptionHandle, BusError>
    where
        F: FnMut(RemovalNotice) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| BusError::NoRuntime)?;
        let mut receiver = self.sender.subscribe();
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);

        let task = runtime.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(notice) => handler(notice),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(subscription = id, missed, "Subscriber lagged, removal notices dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);
        Ok(SubscriptionHandle(id))
    }

    /// Stops delivery to a handler subscription.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), BusError> {
        let task = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.0)
            .ok_or(BusError::UnknownSubscription(handle.0))?;
        task.abort();
        Ok(())
    }

    /// Live receivers, inboxes included.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        let handlers = self.handlers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in handlers.drain() {
            task.abort();
        }
    }
}

/// Receiving end owned by one window.
pub struct Inbox {
    receiver: broadcast::Receiver<RemovalNotice>,
}

impl Inbox {
    /// Everything delivered since the last drain, without waiting.
    pub fn drain(&mut self) -> Vec<RemovalNotice> {
        let mut notices = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(notice) => notices.push(notice),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Inbox lagged, removal notices dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        notices
    }

    /// Waits for the next notice; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<RemovalNotice> {
        loop {
            match self.receiver.recv().await {
                Ok(notice) => return Some(notice),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Inbox lagged, removal notices dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

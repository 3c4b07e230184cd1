//! Unit tests for the cross-window event bus.

use std::time::Duration;

use tabdock::services::event_bus::{EventBus, RemovalNotice};
use tabdock::types::drag::{ClaimStamp, GestureId, WindowId};
use tabdock::types::errors::BusError;
use tabdock::types::tab::TabId;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn notice(tab: &str, gesture: Option<u64>) -> RemovalNotice {
    RemovalNotice {
        tab_id: TabId::from(tab),
        claimed_by: WindowId::from("window-b"),
        claim: ClaimStamp(1),
        gesture: gesture.map(GestureId),
    }
}

#[test]
fn test_publish_without_subscribers_is_silent() {
    let bus = EventBus::new(8);
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(bus.publish(notice("t1", None)), 0);
}

#[test]
fn test_every_inbox_receives_each_notice() {
    let bus = EventBus::new(8);
    let mut first = bus.inbox();
    let mut second = bus.inbox();
    assert_eq!(bus.subscriber_count(), 2);

    assert_eq!(bus.publish(notice("t1", Some(1))), 2);
    assert_eq!(first.drain(), vec![notice("t1", Some(1))]);
    assert_eq!(second.drain(), vec![notice("t1", Some(1))]);
    assert!(first.drain().is_empty());
}

#[test]
fn test_inbox_keeps_publish_order() {
    let bus = EventBus::new(8);
    let mut inbox = bus.inbox();
    for tab in ["a", "b", "c"] {
        bus.publish(notice(tab, None));
    }
    let tabs: Vec<String> = inbox.drain().into_iter().map(|n| n.tab_id.to_string()).collect();
    assert_eq!(tabs, vec!["a", "b", "c"]);
}

#[test]
fn test_dropped_inbox_stops_counting() {
    let bus = EventBus::new(8);
    let inbox = bus.inbox();
    assert_eq!(bus.subscriber_count(), 1);
    drop(inbox);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn test_zero_capacity_is_raised_to_one() {
    let bus = EventBus::new(0);
    let mut inbox = bus.inbox();
    bus.publish(notice("a", None));
    assert_eq!(inbox.drain().len(), 1);
}

#[tokio::test]
async fn test_inbox_recv_waits_for_next_notice() {
    let bus = EventBus::new(8);
    let mut inbox = bus.inbox();
    bus.publish(notice("t1", Some(3)));
    let received = timeout(Duration::from_secs(1), inbox.recv()).await.unwrap();
    assert_eq!(received, Some(notice("t1", Some(3))));
}

#[tokio::test]
async fn test_inbox_recv_returns_none_when_bus_is_gone() {
    let bus = EventBus::new(8);
    let mut inbox = bus.inbox();
    drop(bus);
    assert_eq!(inbox.recv().await, None);
}

#[tokio::test]
async fn test_subscribed_handler_runs_for_each_notice() {
    let bus = EventBus::new(8);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = bus
        .subscribe(move |n| {
            let _ = tx.send(n);
        })
        .unwrap();
    assert!(handle.id() > 0);

    bus.publish(notice("t1", Some(1)));
    bus.publish(notice("t2", Some(2)));

    let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    let second = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    assert_eq!(first, Some(notice("t1", Some(1))));
    assert_eq!(second, Some(notice("t2", Some(2))));
}

#[tokio::test]
async fn test_unsubscribe_twice_fails() {
    let bus = EventBus::new(8);
    let handle = bus.subscribe(|_| {}).unwrap();
    assert!(bus.unsubscribe(handle).is_ok());
    assert!(matches!(
        bus.unsubscribe(handle),
        Err(BusError::UnknownSubscription(id)) if id == handle.id()
    ));
}

#[tokio::test]
async fn test_subscription_ids_are_distinct() {
    let bus = EventBus::new(8);
    let a = bus.subscribe(|_| {}).unwrap();
    let b = bus.subscribe(|_| {}).unwrap();
    assert_ne!(a, b);
}

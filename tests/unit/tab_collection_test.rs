use tabdock::managers::tab_collection::TabCollection;
use tabdock::types::tab::{Link, TabId, TabRecord};

fn linked(site: &str) -> TabRecord {
    TabRecord::with_link(Link::new(format!("https://{}", site), None), false)
}

/// Collection of [a, b, c] with the cursor on `current`.
fn three_tabs(current: usize) -> (TabCollection, Vec<TabId>) {
    let tabs = vec![linked("a.com"), linked("b.com"), linked("c.com")];
    let ids = tabs.iter().map(|t| t.id().clone()).collect();
    (TabCollection::from_parts(tabs, current, false), ids)
}

#[test]
fn test_new_collection_has_one_blank_tab() {
    let tabs = TabCollection::new(true);
    assert_eq!(tabs.count(), 1);
    assert_eq!(tabs.current_index(), 0);
    assert!(tabs.current_tab().is_blank());
    assert!(tabs.current_tab().is_desktop);
}

#[test]
fn test_add_appends_and_selects() {
    let mut tabs = TabCollection::new(false);
    let tab = linked("a.com");
    let id = tab.id().clone();
    tabs.add(tab);
    assert_eq!(tabs.count(), 2);
    assert_eq!(tabs.current_index(), 1);
    assert_eq!(tabs.current_tab().id(), &id);
}

#[test]
fn test_add_existing_identity_selects_instead_of_duplicating() {
    let (mut tabs, ids) = three_tabs(2);
    let existing = tabs.get(0).unwrap().clone();
    tabs.add(existing);
    assert_eq!(tabs.count(), 3);
    assert_eq!(tabs.current_tab().id(), &ids[0]);
}

#[test]
fn test_insert_clamps_index() {
    let (mut tabs, _) = three_tabs(0);
    let tab = linked("z.com");
    let id = tab.id().clone();
    tabs.insert(tab, 99);
    assert_eq!(tabs.index_of(&id), Some(3));
    assert_eq!(tabs.current_index(), 0);
}

#[test]
fn test_insert_after_cursor_leaves_cursor_alone() {
    let (mut tabs, ids) = three_tabs(1);
    tabs.insert(linked("z.com"), 2);
    assert_eq!(tabs.current_index(), 1);
    assert_eq!(tabs.current_tab().id(), &ids[1]);
}

#[test]
fn test_insert_at_cursor_tracks_same_tab() {
    let (mut tabs, ids) = three_tabs(1);
    tabs.insert(linked("z.com"), 1);
    assert_eq!(tabs.current_index(), 2);
    assert_eq!(tabs.current_tab().id(), &ids[1]);
}

#[test]
fn test_remove_only_tab_self_heals() {
    let mut tabs = TabCollection::new(false);
    let original = tabs.current_tab().id().clone();
    let removed = tabs.remove(0).unwrap();
    assert_eq!(removed.id(), &original);
    assert_eq!(tabs.count(), 1);
    assert_eq!(tabs.current_index(), 0);
    assert!(tabs.current_tab().is_blank());
    assert_ne!(tabs.current_tab().id(), &original);
}

#[test]
fn test_remove_before_cursor_decrements() {
    let (mut tabs, ids) = three_tabs(2);
    tabs.remove(0);
    assert_eq!(tabs.current_index(), 1);
    assert_eq!(tabs.current_tab().id(), &ids[2]);
}

#[test]
fn test_remove_at_cursor_moves_to_previous() {
    let (mut tabs, ids) = three_tabs(1);
    tabs.remove(1);
    assert_eq!(tabs.current_index(), 0);
    assert_eq!(tabs.current_tab().id(), &ids[0]);
}

#[test]
fn test_remove_at_cursor_zero_stays_zero() {
    let (mut tabs, ids) = three_tabs(0);
    tabs.remove(0);
    assert_eq!(tabs.current_index(), 0);
    assert_eq!(tabs.current_tab().id(), &ids[1]);
}

#[test]
fn test_remove_after_cursor_leaves_cursor_alone() {
    let (mut tabs, _) = three_tabs(0);
    tabs.remove(2);
    assert_eq!(tabs.current_index(), 0);
    assert_eq!(tabs.count(), 2);
}

#[test]
fn test_remove_out_of_bounds_is_noop() {
    let (mut tabs, ids) = three_tabs(1);
    assert!(tabs.remove(3).is_none());
    assert_eq!(tabs.ids(), ids);
    assert_eq!(tabs.current_index(), 1);
}

#[test]
fn test_remove_absent_identity_is_idempotent() {
    let (mut tabs, ids) = three_tabs(1);
    assert!(tabs.remove_tab(&ids[0]).is_some());
    let after_first = tabs.ids();
    assert!(tabs.remove_tab(&ids[0]).is_none());
    assert!(tabs.remove_tab(&TabId::from("never-existed")).is_none());
    assert_eq!(tabs.ids(), after_first);
}

#[test]
fn test_move_tab_preserves_selection() {
    let (mut tabs, ids) = three_tabs(1);
    let from = tabs.index_of(&ids[1]).unwrap();
    tabs.move_tab(from, 0);
    assert_eq!(tabs.ids(), vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]);
    assert_eq!(tabs.current_index(), 0);
    assert_eq!(tabs.current_tab().id(), &ids[1]);
}

#[test]
fn test_move_other_tab_across_cursor_follows_current() {
    let (mut tabs, ids) = three_tabs(1);
    tabs.move_tab(2, 0);
    assert_eq!(tabs.current_tab().id(), &ids[1]);
    assert_eq!(tabs.current_index(), 2);
}

#[test]
fn test_move_out_of_bounds_is_noop() {
    let (mut tabs, ids) = three_tabs(2);
    tabs.move_tab(0, 3);
    tabs.move_tab(5, 0);
    assert_eq!(tabs.ids(), ids);
    assert_eq!(tabs.current_index(), 2);
}

#[test]
fn test_select_out_of_bounds_is_noop() {
    let (mut tabs, _) = three_tabs(2);
    tabs.select(3);
    assert_eq!(tabs.current_index(), 2);
    tabs.select(0);
    assert_eq!(tabs.current_index(), 0);
}

#[test]
fn test_select_tab_by_identity() {
    let (mut tabs, ids) = three_tabs(0);
    tabs.select_tab(&ids[2]).unwrap();
    assert_eq!(tabs.current_index(), 2);
    assert!(tabs.select_tab(&TabId::from("missing")).is_err());
    assert_eq!(tabs.current_index(), 2);
}

#[test]
fn test_from_parts_drops_duplicates_and_clamps() {
    let tab = linked("a.com");
    let tabs = TabCollection::from_parts(vec![tab.clone(), tab.clone(), linked("b.com")], 7, false);
    assert_eq!(tabs.count(), 2);
    assert_eq!(tabs.current_index(), 0);

    let empty = TabCollection::from_parts(Vec::new(), 0, false);
    assert_eq!(empty.count(), 1);
}

#[test]
fn test_from_parts_cursor_follows_tab_past_dropped_duplicates() {
    let a = linked("a.com");
    let b = linked("b.com");
    let c = linked("c.com");

    let tabs = TabCollection::from_parts(vec![a.clone(), a.clone(), b.clone(), c.clone()], 2, false);
    assert_eq!(tabs.count(), 3);
    assert_eq!(tabs.current_tab().id(), b.id());
    assert_eq!(tabs.current_index(), 1);

    // A cursor on a dropped duplicate lands on the kept copy.
    let tabs = TabCollection::from_parts(vec![b.clone(), a.clone(), c, a.clone()], 3, false);
    assert_eq!(tabs.current_tab().id(), a.id());
    assert_eq!(tabs.current_index(), 1);
}

#[test]
fn test_unread_and_active_tabs() {
    let mut tabs = TabCollection::new(false);
    assert!(!tabs.has_active_tabs());
    assert!(!tabs.has_unread());

    tabs.set_link(0, Some(Link::new("https://a.com", None))).unwrap();
    assert!(tabs.has_active_tabs());

    tabs.mark_viewed(0, false).unwrap();
    assert!(tabs.has_unread());
}

#[test]
fn test_clear_all_leaves_one_blank_tab() {
    let (mut tabs, _) = three_tabs(2);
    tabs.clear_all();
    assert_eq!(tabs.count(), 1);
    assert_eq!(tabs.current_index(), 0);
    assert!(tabs.current_tab().is_blank());
}

#[test]
fn test_toggle_desktop_mode() {
    let mut tabs = TabCollection::new(false);
    tabs.toggle_desktop_mode(0).unwrap();
    assert!(tabs.current_tab().is_desktop);
    tabs.toggle_desktop_mode(0).unwrap();
    assert!(!tabs.current_tab().is_desktop);
}

//! Unit tests for property-map encoding, activities and drag payloads.

use serde_json::json;
use tabdock::managers::tab_collection::TabCollection;
use tabdock::services::activity_codec::*;
use tabdock::types::drag::DropPayload;
use tabdock::types::errors::{CodecError, PayloadError};
use tabdock::types::tab::{Link, TabId, TabRecord};

fn map(value: serde_json::Value) -> PropertyMap {
    value.as_object().cloned().unwrap()
}

fn sample_collection() -> TabCollection {
    let tabs = vec![
        TabRecord::with_id(TabId::from("A"), Some(Link::new("https://a.com", Some("A".into()))), true, false),
        TabRecord::with_id(TabId::from("B"), None, false, true),
    ];
    TabCollection::from_parts(tabs, 1, false)
}

#[test]
fn test_encode_tab_writes_all_keys() {
    let tab = TabRecord::with_id(TabId::from("X"), Some(Link::new("https://x.com", None)), false, true);
    let encoded = encode_tab(&tab);
    assert_eq!(encoded["uid"], json!("X"));
    assert_eq!(encoded["link"]["url"], json!("https://x.com"));
    assert_eq!(encoded["viewed"], json!(false));
    assert_eq!(encoded["desktop"], json!(true));
}

#[test]
fn test_decode_tab_without_uid_gets_fresh_identity() {
    let a = decode_tab(&map(json!({ "viewed": false }))).unwrap();
    let b = decode_tab(&map(json!({ "viewed": false }))).unwrap();
    assert_ne!(a.id(), b.id());
    assert!(!a.viewed);
}

#[test]
fn test_decode_tab_rejects_wrong_types() {
    let result = decode_tab(&map(json!({ "uid": "a", "viewed": "yes" })));
    assert!(matches!(result, Err(CodecError::Malformed(_))));
}

#[test]
fn test_encode_collection_uses_modern_keys() {
    let encoded = encode_collection(&sample_collection());
    assert_eq!(encoded["currentIndex2"], json!(1));
    assert_eq!(encoded["tabs2"].as_array().map(Vec::len), Some(2));
    assert!(!encoded.contains_key("tabs"));
    assert!(!encoded.contains_key("currentIndex"));
}

#[test]
fn test_collection_roundtrip_keeps_order_identity_and_cursor() {
    let original = sample_collection();
    let decoded = decode_collection(&encode_collection(&original), false).unwrap();
    assert_eq!(decoded.ids(), original.ids());
    assert_eq!(decoded.current_index(), 1);
    assert!(!decoded.get(1).unwrap().viewed);
    assert!(decoded.get(1).unwrap().is_desktop);
}

#[test]
fn test_decode_collection_reads_legacy_keys() {
    let legacy = map(json!({
        "tabs": [{ "uid": "a" }, { "uid": "b" }, { "uid": "c" }],
        "currentIndex": 2
    }));
    let tabs = decode_collection(&legacy, false).unwrap();
    assert_eq!(tabs.count(), 3);
    assert_eq!(tabs.current_index(), 2);
    assert_eq!(tabs.current_tab().id().as_str(), "c");
}

#[test]
fn test_decode_collection_prefers_modern_keys() {
    let both = map(json!({
        "tabs2": [{ "uid": "new" }],
        "currentIndex2": 0,
        "tabs": [{ "uid": "old-1" }, { "uid": "old-2" }],
        "currentIndex": 1
    }));
    let tabs = decode_collection(&both, false).unwrap();
    assert_eq!(tabs.count(), 1);
    assert_eq!(tabs.current_tab().id().as_str(), "new");
}

#[test]
fn test_decode_collection_clamps_cursor_past_end() {
    let tabs = decode_collection(&map(json!({ "tabs2": [{ "uid": "a" }], "currentIndex2": 9 })), false).unwrap();
    assert_eq!(tabs.current_index(), 0);
}

#[test]
fn test_decode_collection_with_empty_list_self_heals() {
    let tabs = decode_collection(&map(json!({ "tabs2": [] })), true).unwrap();
    assert_eq!(tabs.count(), 1);
    assert!(tabs.current_tab().is_blank());
    assert!(tabs.current_tab().is_desktop);
}

#[test]
fn test_decode_collection_without_tabs_is_missing_key() {
    let result = decode_collection(&map(json!({ "currentIndex2": 0 })), false);
    assert!(matches!(result, Err(CodecError::MissingKey(ref key)) if key == "tabs2"));
}

#[test]
fn test_restore_collection_falls_back_to_blank() {
    let tabs = restore_collection(&map(json!({ "tabs2": "garbage" })), false);
    assert_eq!(tabs.count(), 1);
    assert!(tabs.current_tab().is_blank());
}

#[test]
fn test_collection_activity_roundtrip() {
    let original = sample_collection();
    let activity = collection_activity(&original);
    assert_eq!(activity.activity_type, OPEN_TAB_COLLECTION_ACTIVITY);
    assert_eq!(activity.title, "Home");

    let restored = restore_collection_from_activity(&activity, false).unwrap();
    assert_eq!(restored.ids(), original.ids());
}

#[test]
fn test_tab_activity_roundtrip() {
    let tab = TabRecord::with_link(Link::new("https://docs.rs", Some("Docs".into())), false);
    let activity = tab_activity(&tab);
    assert_eq!(activity.activity_type, OPEN_TAB_ACTIVITY);
    assert_eq!(activity.title, "Docs");

    let restored = restore_tab_from_activity(&activity).unwrap();
    assert_eq!(restored.id(), tab.id());
    assert_eq!(restored.link, tab.link);
}

#[test]
fn test_activities_of_the_wrong_type_are_ignored() {
    let tab_activity = tab_activity(&TabRecord::blank(false));
    assert!(restore_collection_from_activity(&tab_activity, false).is_none());

    let window_activity = collection_activity(&sample_collection());
    assert!(restore_tab_from_activity(&window_activity).is_none());
}

#[test]
fn test_activity_without_user_info_is_ignored() {
    let activity = UserActivity {
        activity_type: OPEN_TAB_ACTIVITY.to_string(),
        title: "Home".to_string(),
        user_info: None,
    };
    assert!(restore_tab_from_activity(&activity).is_none());
}

#[test]
fn test_provider_data_roundtrip_keeps_identity() {
    let tab = TabRecord::with_link(Link::new("https://a.com", None), false);
    let data = provider_data(&tab).unwrap();
    let payload = DropPayload::from_provider_data(TAB_TYPE_IDENTIFIER, &data).unwrap();
    assert_eq!(payload.tab_id(), Some(tab.id()));
}

#[test]
fn test_unsupported_type_identifier() {
    let result = DropPayload::from_provider_data("public.image", b"...");
    match result {
        Err(PayloadError::NotSupported { expected, actual }) => {
            assert_eq!(expected, DropPayload::readable_type_identifiers());
            assert_eq!(actual, vec!["public.image".to_string()]);
        }
        other => panic!("expected NotSupported, got {:?}", other),
    }
}

#[test]
fn test_corrupt_tab_payload_is_invalid() {
    let result = DropPayload::from_provider_data(TAB_TYPE_IDENTIFIER, b"{ nope");
    assert!(matches!(result, Err(PayloadError::Invalid(_))));
}

//! Property-based tests for property-map persistence of tab collections.
//!
//! Whatever collection goes in comes back with the same order, identities,
//! per-tab flags and cursor, whether it travels under the current or the
//! legacy keys.

use proptest::prelude::*;
use serde_json::{json, Value};
use tabdock::managers::tab_collection::TabCollection;
use tabdock::services::activity_codec::{decode_collection, encode_collection, PropertyMap};
use tabdock::types::tab::{Link, TabId, TabRecord};

fn arb_link() -> impl Strategy<Value = Option<Link>> {
    prop::option::of(
        ("[a-z]{1,12}", prop::option::of("[A-Za-z ]{0,16}"))
            .prop_map(|(host, title)| Link::new(format!("https://{}.example/", host), title)),
    )
}

fn arb_tab() -> impl Strategy<Value = TabRecord> {
    (arb_link(), any::<bool>(), any::<bool>())
        .prop_map(|(link, viewed, desktop)| TabRecord::with_id(TabId::new(), link, viewed, desktop))
}

fn arb_collection() -> impl Strategy<Value = TabCollection> {
    (prop::collection::vec(arb_tab(), 1..10), 0..10usize).prop_map(|(tabs, index)| {
        let index = index % tabs.len();
        TabCollection::from_parts(tabs, index, false)
    })
}

/// Moves the current keys to their legacy names.
fn as_legacy(mut map: PropertyMap) -> PropertyMap {
    if let Some(tabs) = map.remove("tabs2") {
        map.insert("tabs".to_string(), tabs);
    }
    if let Some(index) = map.remove("currentIndex2") {
        map.insert("currentIndex".to_string(), index);
    }
    map
}

fn assert_same(original: &TabCollection, decoded: &TabCollection) -> Result<(), TestCaseError> {
    prop_assert_eq!(decoded.ids(), original.ids());
    prop_assert_eq!(decoded.current_index(), original.current_index());
    for (a, b) in original.tabs().iter().zip(decoded.tabs()) {
        prop_assert_eq!(&a.link, &b.link);
        prop_assert_eq!(a.viewed, b.viewed);
        prop_assert_eq!(a.is_desktop, b.is_desktop);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn encoded_collection_decodes_unchanged(collection in arb_collection()) {
        let decoded = decode_collection(&encode_collection(&collection), false).unwrap();
        assert_same(&collection, &decoded)?;
    }

    #[test]
    fn legacy_keys_decode_unchanged(collection in arb_collection()) {
        let legacy = as_legacy(encode_collection(&collection));
        let decoded = decode_collection(&legacy, false).unwrap();
        assert_same(&collection, &decoded)?;
    }

    #[test]
    fn encoding_survives_json_text(collection in arb_collection()) {
        let text = serde_json::to_string(&Value::Object(encode_collection(&collection))).unwrap();
        let map: PropertyMap = serde_json::from_str(&text).unwrap();
        let decoded = decode_collection(&map, false).unwrap();
        assert_same(&collection, &decoded)?;
    }

    #[test]
    fn any_stored_index_gives_a_valid_cursor(count in 1..8usize, index in any::<i64>()) {
        let tabs: Vec<Value> = (0..count).map(|n| json!({ "uid": format!("tab-{}", n) })).collect();
        let map = json!({ "tabs2": tabs, "currentIndex2": index });
        let decoded = decode_collection(map.as_object().unwrap(), false).unwrap();
        prop_assert_eq!(decoded.count(), count);
        prop_assert!(decoded.current_index() < count);
        if index >= 0 && (index as usize) < count {
            prop_assert_eq!(decoded.current_index(), index as usize);
        } else {
            prop_assert_eq!(decoded.current_index(), 0);
        }
    }
}

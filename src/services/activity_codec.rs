//! Property-map encoding for Tabdock.
//!
//! Tabs and whole collections cross process and persistence boundaries as
//! string-keyed property maps. Decoding accepts the legacy `tabs` /
//! `currentIndex` keys alongside the current `tabs2` / `currentIndex2`, fills in
//! missing per-tab flags and clamps the restored cursor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::managers::tab_collection::TabCollection;
use crate::types::drag::DropPayload;
use crate::types::errors::{CodecError, PayloadError};
use crate::types::tab::{Link, TabId, TabRecord, HOME_TAB_TITLE};

pub type PropertyMap = Map<String, Value>;

pub const OPEN_TAB_COLLECTION_ACTIVITY: &str = "com.tabdock.openTabCollection";
pub const OPEN_TAB_ACTIVITY: &str = "com.tabdock.openTabInNewWindow";

pub const TAB_TYPE_IDENTIFIER: &str = "com.tabdock.tab";
pub const URL_TYPE_IDENTIFIER: &str = "public.url";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTab {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    link: Option<Link>,
    #[serde(default)]
    viewed: Option<bool>,
    #[serde(default)]
    desktop: Option<bool>,
}

impl StoredTab {
    fn from_tab(tab: &TabRecord) -> Self {
        Self {
            uid: Some(tab.id().to_string()),
            link: tab.link.clone(),
            viewed: Some(tab.viewed),
            desktop: Some(tab.is_desktop),
        }
    }

    fn into_tab(self) -> TabRecord {
        let id = self.uid.map(TabId::from).unwrap_or_default();
        TabRecord::with_id(
            id,
            self.link,
            self.viewed.unwrap_or(true),
            self.desktop.unwrap_or(false),
        )
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCollection {
    #[serde(rename = "tabs2", default, skip_serializing_if = "Option::is_none")]
    tabs: Option<Vec<StoredTab>>,
    #[serde(rename = "currentIndex2", default, skip_serializing_if = "Option::is_none")]
    current_index: Option<i64>,
    #[serde(rename = "tabs", default, skip_serializing_if = "Option::is_none")]
    legacy_tabs: Option<Vec<StoredTab>>,
    #[serde(rename = "currentIndex", default, skip_serializing_if = "Option::is_none")]
    legacy_current_index: Option<i64>,
}

fn to_map<T: Serialize>(value: &T) -> PropertyMap {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => PropertyMap::new(),
    }
}

fn from_map<T: for<'de> Deserialize<'de>>(map: &PropertyMap) -> Result<T, CodecError> {
    serde_json::from_value(Value::Object(map.clone())).map_err(|e| CodecError::Malformed(e.to_string()))
}

pub fn encode_tab(tab: &TabRecord) -> PropertyMap {
    to_map(&StoredTab::from_tab(tab))
}

/// A missing `uid` gets a fresh identity, missing `viewed` means viewed and
/// missing `desktop` means mobile rendering.
pub fn decode_tab(map: &PropertyMap) -> Result<TabRecord, CodecError> {
    from_map::<StoredTab>(map).map(StoredTab::into_tab)
}

pub fn encode_collection(tabs: &TabCollection) -> PropertyMap {
    let stored = StoredCollection {
        tabs: Some(tabs.tabs().iter().map(StoredTab::from_tab).collect()),
        current_index: Some(tabs.current_index() as i64),
        ..StoredCollection::default()
    };
    to_map(&stored)
}

pub fn decode_collection(map: &PropertyMap, desktop_default: bool) -> Result<TabCollection, CodecError> {
    let stored: StoredCollection = from_map(map)?;

    let tabs = stored
        .tabs
        .or(stored.legacy_tabs)
        .ok_or_else(|| CodecError::MissingKey("tabs2".to_string()))?;
    let tabs: Vec<TabRecord> = tabs.into_iter().map(StoredTab::into_tab).collect();

    let index = stored
        .current_index
        .or(stored.legacy_current_index)
        .unwrap_or(0);
    let index = usize::try_from(index).unwrap_or(0);

    Ok(TabCollection::from_parts(tabs, index, desktop_default))
}

/// Like [`decode_collection`], but a map that cannot be decoded yields a fresh
/// collection with one blank tab.
pub fn restore_collection(map: &PropertyMap, desktop_default: bool) -> TabCollection {
    decode_collection(map, desktop_default).unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to a blank tab collection");
        TabCollection::new(desktop_default)
    })
}

/// State handed to the platform to reopen a window or a tab elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub activity_type: String,
    pub title: String,
    pub user_info: Option<PropertyMap>,
}

/// Activity that reopens a whole window.
pub fn collection_activity(tabs: &TabCollection) -> UserActivity {
    UserActivity {
        activity_type: OPEN_TAB_COLLECTION_ACTIVITY.to_string(),
        title: tabs.current_tab().display_title().to_string(),
        user_info: Some(encode_collection(tabs)),
    }
}

/// Activity that opens a single tab in a new window.
pub fn tab_activity(tab: &TabRecord) -> UserActivity {
    UserActivity {
        activity_type: OPEN_TAB_ACTIVITY.to_string(),
        title: tab
            .link
            .as_ref()
            .map(|l| l.display_title().to_string())
            .unwrap_or_else(|| HOME_TAB_TITLE.to_string()),
        user_info: Some(encode_tab(tab)),
    }
}

pub fn restore_collection_from_activity(activity: &UserActivity, desktop_default: bool) -> Option<TabCollection> {
    if activity.activity_type != OPEN_TAB_COLLECTION_ACTIVITY {
        debug!(activity_type = %activity.activity_type, "Not a tab collection activity");
        return None;
    }
    let user_info = activity.user_info.as_ref()?;
    match decode_collection(user_info, desktop_default) {
        Ok(tabs) => Some(tabs),
        Err(e) => {
            warn!(error = %e, "Could not restore tab collection from activity");
            None
        }
    }
}

pub fn restore_tab_from_activity(activity: &UserActivity) -> Option<TabRecord> {
    if activity.activity_type != OPEN_TAB_ACTIVITY {
        debug!(activity_type = %activity.activity_type, "Not an open-tab activity");
        return None;
    }
    let user_info = activity.user_info.as_ref()?;
    match decode_tab(user_info) {
        Ok(tab) => Some(tab),
        Err(e) => {
            warn!(error = %e, "Could not restore tab from activity");
            None
        }
    }
}

/// The in-app representation written to a drag item.
pub fn provider_data(tab: &TabRecord) -> Result<Vec<u8>, PayloadError> {
    serde_json::to_vec(&encode_tab(tab)).map_err(|e| PayloadError::Invalid(e.to_string()))
}

impl DropPayload {
    pub fn readable_type_identifiers() -> Vec<String> {
        vec![TAB_TYPE_IDENTIFIER.to_string(), URL_TYPE_IDENTIFIER.to_string()]
    }

    /// Resolves the data a drop item offers under `type_identifier`.
    pub fn from_provider_data(type_identifier: &str, data: &[u8]) -> Result<Self, PayloadError> {
        match type_identifier {
            TAB_TYPE_IDENTIFIER => {
                let map: PropertyMap =
                    serde_json::from_slice(data).map_err(|e| PayloadError::Invalid(e.to_string()))?;
                let tab = decode_tab(&map).map_err(|e| PayloadError::Invalid(e.to_string()))?;
                Ok(DropPayload::InAppTab(tab))
            }
            URL_TYPE_IDENTIFIER => {
                let text = std::str::from_utf8(data).map_err(|e| PayloadError::Invalid(e.to_string()))?;
                let url = Url::parse(text.trim()).map_err(|e| PayloadError::Invalid(e.to_string()))?;
                Ok(DropPayload::ExternalLink(Link::new(url.to_string(), None)))
            }
            other => Err(PayloadError::NotSupported {
                expected: Self::readable_type_identifiers(),
                actual: vec![other.to_string()],
            }),
        }
    }
}

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-wide unique tab identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The page a tab points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Link {
    pub fn new(url: impl Into<String>, title: Option<String>) -> Self {
        Self {
            url: url.into(),
            title,
        }
    }

    /// Title if there is a non-empty one, otherwise the URL.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.url,
        }
    }
}

/// One browser tab.
///
/// Equality and hashing go through `id` only: two tabs showing the same link
/// are still two tabs.
#[derive(Debug, Clone)]
pub struct TabRecord {
    id: TabId,
    pub link: Option<Link>,
    pub viewed: bool,
    pub is_desktop: bool,
}

impl TabRecord {
    /// A blank tab with a fresh identity.
    pub fn blank(desktop: bool) -> Self {
        Self::with_id(TabId::new(), None, true, desktop)
    }

    pub fn with_link(link: Link, desktop: bool) -> Self {
        Self::with_id(TabId::new(), Some(link), true, desktop)
    }

    pub fn with_id(id: TabId, link: Option<Link>, viewed: bool, desktop: bool) -> Self {
        Self {
            id,
            link,
            viewed,
            is_desktop: desktop,
        }
    }

    pub fn id(&self) -> &TabId {
        &self.id
    }

    pub fn is_blank(&self) -> bool {
        self.link.is_none()
    }

    pub fn toggle_desktop_mode(&mut self) {
        self.is_desktop = !self.is_desktop;
    }

    /// Title shown for the tab; blank tabs show "Home".
    pub fn display_title(&self) -> &str {
        self.link
            .as_ref()
            .map(Link::display_title)
            .unwrap_or(HOME_TAB_TITLE)
    }
}

impl PartialEq for TabRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TabRecord {}

impl Hash for TabRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub const HOME_TAB_TITLE: &str = "Home";

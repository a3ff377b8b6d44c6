/// Capabilities the extension needs from the browser
///
/// Actions and the menu controller only talk to these traits; `browser`
/// provides the real implementations and tests use in-memory fakes.
use crate::error::HostError;
use crate::tab_data::{NewTab, TabInfo, WindowInfo};
use serde::Serialize;
use serde_json::{Map, Value};

/// Tab and window queries/creation
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Highlighted tabs of the current window, in tab-strip order
    async fn query_highlighted(&self) -> Result<Vec<TabInfo>, HostError>;

    async fn create_tab(&self, tab: NewTab) -> Result<TabInfo, HostError>;

    async fn create_window(&self, url: &str) -> Result<WindowInfo, HostError>;
}

/// System clipboard text access
#[allow(async_fn_in_trait)]
pub trait ClipboardHost {
    async fn read_text(&self) -> Result<String, HostError>;

    async fn write_text(&self, text: &str) -> Result<(), HostError>;
}

/// Extension-scoped persistent key-value storage
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_all(&self) -> Result<Map<String, Value>, HostError>;

    /// Persist the given keys, leaving the others untouched
    async fn set(&self, items: Map<String, Value>) -> Result<(), HostError>;
}

/// Context-menu registration and updates
#[allow(async_fn_in_trait)]
pub trait MenuHost {
    async fn remove_all(&self) -> Result<(), HostError>;

    async fn create(&self, item: &MenuItem) -> Result<(), HostError>;

    async fn update(&self, id: &str, update: &MenuUpdate) -> Result<(), HostError>;

    /// Redraw a menu that is currently shown
    async fn refresh(&self) -> Result<(), HostError>;
}

/// Localized message lookup
pub trait Localizer {
    /// Message for `key`; implementations fall back to the key itself when missing
    fn message(&self, key: &str) -> String;
}

/// Properties of a context-menu item at creation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub enabled: bool,
    pub contexts: Vec<String>,
}

/// Partial update of a context-menu item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

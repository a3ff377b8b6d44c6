/// Data structures for tabs and windows as the host reports them
use serde::{Deserialize, Serialize};

/// Information about a browser tab
///
/// Host tab objects carry many more fields; everything we do not read is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub index: i32,
}

impl TabInfo {
    pub fn new(id: i32, url: String, title: String, highlighted: bool, index: i32) -> TabInfo {
        TabInfo {
            id,
            url,
            title,
            highlighted,
            index,
        }
    }

    /// Visible text for a link to this tab: the title, or the URL when there is none
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// A browser window, as returned by window creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: i32,
}

/// Properties for a tab to be created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTab {
    pub url: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,
}

impl NewTab {
    /// A background tab in the current window
    pub fn inactive(url: impl Into<String>) -> NewTab {
        NewTab {
            url: url.into(),
            active: false,
            window_id: None,
        }
    }

    pub fn in_window(mut self, window_id: Option<i32>) -> NewTab {
        self.window_id = window_id;
        self
    }
}

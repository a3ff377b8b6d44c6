/// In-memory host fakes that record every call

use crate::error::HostError;
use crate::host::{
    ClipboardHost, KeyValueStore, Localizer, MenuHost, MenuItem, MenuUpdate, TabHost,
};
use crate::tab_data::{NewTab, TabInfo, WindowInfo};
use futures::channel::oneshot;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};

pub fn tab(id: i32, url: &str, title: &str, highlighted: bool) -> TabInfo {
    TabInfo {
        id,
        url: url.to_string(),
        title: title.to_string(),
        highlighted,
        index: id,
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub items: RefCell<Map<String, Value>>,
    pub fail: Cell<bool>,
}

impl FakeStore {
    pub fn snapshot(&self) -> Map<String, Value> {
        self.items.borrow().clone()
    }
}

impl KeyValueStore for FakeStore {
    async fn get_all(&self) -> Result<Map<String, Value>, HostError> {
        if self.fail.get() {
            return Err(HostError::Storage("storage disabled".to_string()));
        }
        Ok(self.snapshot())
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), HostError> {
        if self.fail.get() {
            return Err(HostError::Storage("storage disabled".to_string()));
        }
        self.items.borrow_mut().extend(items);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTabs {
    pub highlighted: RefCell<Vec<TabInfo>>,
    pub fail_query: Cell<bool>,
    pub fail_window: Cell<bool>,
    /// URLs whose tab creation is rejected
    pub rejected_urls: RefCell<Vec<String>>,
    pub created_tabs: RefCell<Vec<NewTab>>,
    pub created_windows: RefCell<Vec<String>>,
    /// When set, the next query waits until the sender fires
    pub query_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeTabs {
    pub fn with_highlighted(tabs: Vec<TabInfo>) -> Self {
        FakeTabs {
            highlighted: RefCell::new(tabs),
            ..Default::default()
        }
    }
}

impl TabHost for FakeTabs {
    async fn query_highlighted(&self) -> Result<Vec<TabInfo>, HostError> {
        if self.fail_query.get() {
            return Err(HostError::Tabs("query denied".to_string()));
        }
        let gate = self.query_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(self.highlighted.borrow().clone())
    }

    async fn create_tab(&self, tab: NewTab) -> Result<TabInfo, HostError> {
        if self.rejected_urls.borrow().contains(&tab.url) {
            return Err(HostError::Tabs(format!("cannot open {}", tab.url)));
        }
        let id = 100 + self.created_tabs.borrow().len() as i32;
        let created = TabInfo::new(id, tab.url.clone(), String::new(), false, id);
        self.created_tabs.borrow_mut().push(tab);
        Ok(created)
    }

    async fn create_window(&self, url: &str) -> Result<WindowInfo, HostError> {
        if self.fail_window.get() {
            return Err(HostError::Windows("window creation denied".to_string()));
        }
        self.created_windows.borrow_mut().push(url.to_string());
        Ok(WindowInfo {
            id: 10 + self.created_windows.borrow().len() as i32,
        })
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    /// `None` means reads are denied
    pub content: RefCell<Option<String>>,
    pub fail_write: Cell<bool>,
    pub written: RefCell<Vec<String>>,
}

impl FakeClipboard {
    pub fn with_text(text: &str) -> Self {
        FakeClipboard {
            content: RefCell::new(Some(text.to_string())),
            ..Default::default()
        }
    }

    pub fn denied() -> Self {
        FakeClipboard::default()
    }
}

impl ClipboardHost for FakeClipboard {
    async fn read_text(&self) -> Result<String, HostError> {
        self.content
            .borrow()
            .clone()
            .ok_or_else(|| HostError::ClipboardUnavailable("permission denied".to_string()))
    }

    async fn write_text(&self, text: &str) -> Result<(), HostError> {
        if self.fail_write.get() {
            return Err(HostError::ClipboardWrite("write denied".to_string()));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// A recorded menu host call
#[derive(Debug, Clone, PartialEq)]
pub enum MenuCall {
    RemoveAll,
    Create(MenuItem),
    Update(String, MenuUpdate),
    Refresh,
}

#[derive(Default)]
pub struct FakeMenus {
    pub calls: RefCell<Vec<MenuCall>>,
    pub fail_update: Cell<bool>,
}

impl FakeMenus {
    pub fn updates(&self) -> Vec<(String, MenuUpdate)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                MenuCall::Update(id, update) => Some((id.clone(), update.clone())),
                _ => None,
            })
            .collect()
    }
}

impl MenuHost for FakeMenus {
    async fn remove_all(&self) -> Result<(), HostError> {
        self.calls.borrow_mut().push(MenuCall::RemoveAll);
        Ok(())
    }

    async fn create(&self, item: &MenuItem) -> Result<(), HostError> {
        self.calls.borrow_mut().push(MenuCall::Create(item.clone()));
        Ok(())
    }

    async fn update(&self, id: &str, update: &MenuUpdate) -> Result<(), HostError> {
        if self.fail_update.get() {
            return Err(HostError::Menus("update rejected".to_string()));
        }
        self.calls
            .borrow_mut()
            .push(MenuCall::Update(id.to_string(), update.clone()));
        Ok(())
    }

    async fn refresh(&self) -> Result<(), HostError> {
        self.calls.borrow_mut().push(MenuCall::Refresh);
        Ok(())
    }
}

/// Returns message keys unchanged so tests can assert on them
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn message(&self, key: &str) -> String {
        key.to_string()
    }
}

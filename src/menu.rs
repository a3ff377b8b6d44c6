/// Tab context-menu controller
///
/// Registers the copy and paste items, keeps their labels in step with the
/// current selection and clipboard, and dispatches clicks to the operations.
use crate::host::{
    ClipboardHost, KeyValueStore, Localizer, MenuHost, MenuItem, MenuUpdate, TabHost,
};
use crate::operations::{copy_selected_tabs, paste_and_open_tabs, resolve_targets};
use crate::settings::SettingsStore;
use crate::tab_data::TabInfo;
use crate::validate::extract_urls;
use std::cell::Cell;
use std::str::FromStr;

pub const COPY_URL_SINGULAR: &str = "copyUrlSingular";
pub const COPY_URL_PLURAL: &str = "copyUrlPlural";
pub const OPEN_URL_SINGULAR: &str = "openUrlSingular";
pub const OPEN_URL_PLURAL: &str = "openUrlPlural";

const TAB_CONTEXT: &str = "tab";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuId {
    Copy,
    Paste,
}

impl MenuId {
    pub const ALL: [MenuId; 2] = [MenuId::Copy, MenuId::Paste];

    pub fn as_str(self) -> &'static str {
        match self {
            MenuId::Copy => "copy-selected-tabs",
            MenuId::Paste => "paste-and-open-tabs",
        }
    }

    fn singular_key(self) -> &'static str {
        match self {
            MenuId::Copy => COPY_URL_SINGULAR,
            MenuId::Paste => OPEN_URL_SINGULAR,
        }
    }

    fn plural_key(self) -> &'static str {
        match self {
            MenuId::Copy => COPY_URL_PLURAL,
            MenuId::Paste => OPEN_URL_PLURAL,
        }
    }

    /// Message key for acting on `count` items
    pub fn title_key(self, count: usize) -> &'static str {
        if count > 1 {
            self.plural_key()
        } else {
            self.singular_key()
        }
    }
}

impl FromStr for MenuId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuId::ALL.into_iter().find(|id| id.as_str() == s).ok_or(())
    }
}

/// Label and enabled state computed for one menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPlan {
    pub title_key: &'static str,
    pub enabled: Option<bool>,
}

impl LabelPlan {
    /// Singular label, enabled; used whenever the real state cannot be computed
    pub fn fallback(id: MenuId) -> LabelPlan {
        LabelPlan {
            title_key: id.singular_key(),
            enabled: Some(true),
        }
    }
}

/// Copy label for a resolved target count
pub fn plan_copy_label(target_count: usize) -> LabelPlan {
    LabelPlan {
        title_key: MenuId::Copy.title_key(target_count),
        enabled: None,
    }
}

/// Paste label and enabled state for the current clipboard text
pub fn plan_paste_label(clipboard_text: &str) -> LabelPlan {
    let count = extract_urls(clipboard_text).len();
    LabelPlan {
        title_key: MenuId::Paste.title_key(count),
        enabled: Some(count > 0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Uninitialized,
    Ready,
}

/// The host services the menu handlers act on
pub struct Services<T, C, S> {
    pub tabs: T,
    pub clipboard: C,
    pub settings: SettingsStore<S>,
}

pub struct MenuController<T, C, S, M, L> {
    services: Services<T, C, S>,
    menus: M,
    i18n: L,
    state: Cell<MenuState>,
    // bumped on every show; label work from an older show is dropped
    shown_generation: Cell<u64>,
}

impl<T, C, S, M, L> MenuController<T, C, S, M, L>
where
    T: TabHost,
    C: ClipboardHost,
    S: KeyValueStore,
    M: MenuHost,
    L: Localizer,
{
    pub fn new(services: Services<T, C, S>, menus: M, i18n: L) -> Self {
        MenuController {
            services,
            menus,
            i18n,
            state: Cell::new(MenuState::Uninitialized),
            shown_generation: Cell::new(0),
        }
    }

    pub fn state(&self) -> MenuState {
        self.state.get()
    }

    /// Register both menu items, replacing whatever was registered before
    pub async fn initialize(&self) {
        if let Err(e) = self.menus.remove_all().await {
            log::warn!("Failed to clear context menus: {}", e);
        }

        for id in MenuId::ALL {
            let item = MenuItem {
                id: id.as_str().to_string(),
                title: self.i18n.message(id.singular_key()),
                enabled: true,
                contexts: vec![TAB_CONTEXT.to_string()],
            };
            if let Err(e) = self.menus.create(&item).await {
                log::error!("Failed to create menu item {}: {}", item.id, e);
            }
        }

        self.state.set(MenuState::Ready);
        log::info!("Context menu items registered");
    }

    /// Recompute labels before the menu is displayed
    pub async fn on_shown(&self, clicked: Option<TabInfo>) {
        if self.state() == MenuState::Uninitialized {
            log::debug!("Menu shown before registration in this process");
        }
        let generation = self.shown_generation.get().wrapping_add(1);
        self.shown_generation.set(generation);

        let copy = match self.services.tabs.query_highlighted().await {
            Ok(highlighted) => {
                plan_copy_label(resolve_targets(highlighted, clicked.as_ref()).len())
            }
            Err(e) => {
                log::warn!("Error updating copy menu: {}", e);
                LabelPlan::fallback(MenuId::Copy)
            }
        };
        if !self.is_current(generation) {
            return;
        }
        self.apply(MenuId::Copy, copy).await;

        let paste = match self.services.clipboard.read_text().await {
            Ok(text) => plan_paste_label(&text),
            Err(e) => {
                log::debug!("Clipboard unreadable for paste menu: {}", e);
                LabelPlan::fallback(MenuId::Paste)
            }
        };
        if !self.is_current(generation) {
            return;
        }
        self.apply(MenuId::Paste, paste).await;

        if let Err(e) = self.menus.refresh().await {
            log::warn!("Failed to refresh menu: {}", e);
        }
    }

    /// Run the action behind a clicked item; unknown ids are ignored
    pub async fn on_clicked(&self, menu_item_id: &str, clicked: Option<TabInfo>) {
        let Ok(id) = menu_item_id.parse::<MenuId>() else {
            log::debug!("Ignoring click on unknown menu item {}", menu_item_id);
            return;
        };

        let Services {
            tabs,
            clipboard,
            settings,
        } = &self.services;
        match id {
            MenuId::Copy => {
                let outcome =
                    copy_selected_tabs(tabs, clipboard, settings, clicked.as_ref()).await;
                log::debug!("Copy finished: {:?}", outcome);
            }
            MenuId::Paste => {
                let outcome = paste_and_open_tabs(tabs, clipboard, settings).await;
                log::debug!("Paste finished: {:?}", outcome);
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        let current = self.shown_generation.get() == generation;
        if !current {
            log::debug!("Dropping stale menu label update");
        }
        current
    }

    async fn apply(&self, id: MenuId, plan: LabelPlan) {
        let update = MenuUpdate {
            title: self.i18n.message(plan.title_key),
            enabled: plan.enabled,
        };
        if let Err(e) = self.menus.update(id.as_str(), &update).await {
            log::warn!("Failed to update menu item {}: {}", id.as_str(), e);
        }
    }
}

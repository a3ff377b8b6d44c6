/// Browser implementations of the host capabilities, over the JS bridge in `host.js`
use crate::clipboard::{ChainedClipboard, ReadText, WriteStrategy};
use crate::error::HostError;
use crate::host::{KeyValueStore, Localizer, MenuHost, MenuItem, MenuUpdate, TabHost};
use crate::menu::{MenuController, Services};
use crate::settings::SettingsStore;
use crate::tab_data::{NewTab, TabInfo, WindowInfo};
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/host.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryHighlightedTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(props: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createWindow(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn readClipboard() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboard(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeAllMenus() -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createMenu(props: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateMenu(id: &str, props: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn refreshMenus() -> Result<(), JsValue>;

    fn getMessage(key: &str) -> String;

    fn attachListeners(
        on_init: &js_sys::Function,
        on_shown: &js_sys::Function,
        on_clicked: &js_sys::Function,
    );
}

fn describe(e: &JsValue) -> String {
    e.as_string()
        .or_else(|| {
            e.dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{:?}", e))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, HostError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| HostError::Decode(format!("Failed to serialize: {:?}", e)))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| HostError::Decode(format!("Failed to parse: {:?}", e)))
}

pub struct BrowserTabs;

impl TabHost for BrowserTabs {
    async fn query_highlighted(&self) -> Result<Vec<TabInfo>, HostError> {
        let tabs_js = queryHighlightedTabs()
            .await
            .map_err(|e| HostError::Tabs(describe(&e)))?;
        from_js(tabs_js)
    }

    async fn create_tab(&self, tab: NewTab) -> Result<TabInfo, HostError> {
        let created = createTab(to_js(&tab)?)
            .await
            .map_err(|e| HostError::Tabs(describe(&e)))?;
        from_js(created)
    }

    async fn create_window(&self, url: &str) -> Result<WindowInfo, HostError> {
        let window = createWindow(url)
            .await
            .map_err(|e| HostError::Windows(describe(&e)))?;
        from_js(window)
    }
}

/// `navigator.clipboard`
pub struct AsyncClipboardApi;

impl ReadText for AsyncClipboardApi {
    async fn read(&self) -> Result<String, HostError> {
        let text = readClipboard()
            .await
            .map_err(|e| HostError::ClipboardUnavailable(describe(&e)))?;
        Ok(text.as_string().unwrap_or_default())
    }
}

impl WriteStrategy for AsyncClipboardApi {
    fn name(&self) -> &'static str {
        "navigator.clipboard"
    }

    fn write<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), HostError>> {
        Box::pin(async move {
            writeClipboard(text)
                .await
                .map_err(|e| HostError::ClipboardWrite(describe(&e)))
        })
    }
}

/// Copy through an off-screen textarea and `execCommand("copy")`
pub struct DomCopyFallback;

/// Off-screen textarea that is removed from the page when dropped
struct ScratchTextArea {
    element: web_sys::HtmlTextAreaElement,
}

impl ScratchTextArea {
    fn attach(document: &web_sys::Document, text: &str) -> Result<Self, JsValue> {
        let element: web_sys::HtmlTextAreaElement =
            document.create_element("textarea")?.dyn_into()?;
        element.set_value(text);
        element.set_attribute("readonly", "")?;
        let style = element.style();
        style.set_property("position", "fixed")?;
        style.set_property("top", "-1000px")?;
        style.set_property("opacity", "0")?;

        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&element)?;
        Ok(ScratchTextArea { element })
    }
}

impl Drop for ScratchTextArea {
    fn drop(&mut self) {
        self.element.remove();
    }
}

impl DomCopyFallback {
    fn copy(text: &str) -> Result<(), JsValue> {
        DomCopyFallback::run_command(text, "copy")
    }

    fn run_command(text: &str, command: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let scratch = ScratchTextArea::attach(&document, text)?;
        scratch.element.select();

        let copied = document
            .dyn_into::<web_sys::HtmlDocument>()?
            .exec_command(command)?;
        if copied {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("{} command was rejected", command)))
        }
    }
}

impl WriteStrategy for DomCopyFallback {
    fn name(&self) -> &'static str {
        "execCommand"
    }

    fn write<'a>(&'a self, text: &'a str) -> LocalBoxFuture<'a, Result<(), HostError>> {
        Box::pin(async move {
            DomCopyFallback::copy(text).map_err(|e| HostError::ClipboardWrite(describe(&e)))
        })
    }
}

/// Clipboard with the async API first and the DOM copy as fallback
pub fn browser_clipboard() -> ChainedClipboard<AsyncClipboardApi> {
    ChainedClipboard::new(
        AsyncClipboardApi,
        vec![Box::new(AsyncClipboardApi), Box::new(DomCopyFallback)],
    )
}

/// `storage.local`
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    async fn get_all(&self) -> Result<Map<String, Value>, HostError> {
        let storage_js = getStorage()
            .await
            .map_err(|e| HostError::Storage(describe(&e)))?;
        if storage_js.is_null() || storage_js.is_undefined() {
            return Ok(Map::new());
        }
        from_js(storage_js)
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), HostError> {
        setStorage(to_js(&items)?)
            .await
            .map_err(|e| HostError::Storage(describe(&e)))
    }
}

pub struct BrowserMenus;

impl MenuHost for BrowserMenus {
    async fn remove_all(&self) -> Result<(), HostError> {
        removeAllMenus()
            .await
            .map_err(|e| HostError::Menus(describe(&e)))
    }

    async fn create(&self, item: &MenuItem) -> Result<(), HostError> {
        createMenu(to_js(item)?)
            .await
            .map_err(|e| HostError::Menus(describe(&e)))
    }

    async fn update(&self, id: &str, update: &MenuUpdate) -> Result<(), HostError> {
        updateMenu(id, to_js(update)?)
            .await
            .map_err(|e| HostError::Menus(describe(&e)))
    }

    async fn refresh(&self) -> Result<(), HostError> {
        refreshMenus()
            .await
            .map_err(|e| HostError::Menus(describe(&e)))
    }
}

/// `i18n.getMessage`, falling back to the key
#[derive(Clone, Copy, PartialEq)]
pub struct BrowserI18n;

impl Localizer for BrowserI18n {
    fn message(&self, key: &str) -> String {
        let message = getMessage(key);
        if message.is_empty() {
            key.to_string()
        } else {
            message
        }
    }
}

/// Replace the text of every `data-i18n` element with its localized message
pub fn localize_document(i18n: &impl Localizer) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(nodes) = document.query_selector_all("[data-i18n]") else {
        return;
    };

    for i in 0..nodes.length() {
        let element = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::Element>().ok());
        let Some(element) = element else {
            continue;
        };
        if let Some(key) = element.get_attribute("data-i18n") {
            element.set_text_content(Some(&i18n.message(&key)));
        }
    }
}

type BrowserController = MenuController<
    BrowserTabs,
    ChainedClipboard<AsyncClipboardApi>,
    BrowserStorage,
    BrowserMenus,
    BrowserI18n,
>;

fn decode_tab(tab: JsValue) -> Option<TabInfo> {
    if tab.is_null() || tab.is_undefined() {
        return None;
    }
    from_js(tab)
        .map_err(|e| log::warn!("Ignoring clicked tab: {}", e))
        .ok()
}

fn menu_item_id(info: &JsValue) -> Option<String> {
    let id = js_sys::Reflect::get(info, &JsValue::from_str("menuItemId")).ok()?;
    id.as_string().or_else(|| id.as_f64().map(|n| n.to_string()))
}

/// Build the menu controller and subscribe it to the host events
///
/// Called once per background process; the closures live as long as the page.
pub fn install_listeners() {
    let services = Services {
        tabs: BrowserTabs,
        clipboard: browser_clipboard(),
        settings: SettingsStore::new(BrowserStorage),
    };
    let controller: Rc<BrowserController> =
        Rc::new(MenuController::new(services, BrowserMenus, BrowserI18n));

    let on_init = {
        let controller = controller.clone();
        Closure::<dyn FnMut()>::new(move || {
            let controller = controller.clone();
            spawn_local(async move { controller.initialize().await });
        })
    };

    let on_shown = {
        let controller = controller.clone();
        Closure::<dyn FnMut(JsValue, JsValue)>::new(move |_info: JsValue, tab: JsValue| {
            let controller = controller.clone();
            let clicked = decode_tab(tab);
            spawn_local(async move { controller.on_shown(clicked).await });
        })
    };

    let on_clicked = Closure::<dyn FnMut(JsValue, JsValue)>::new(
        move |info: JsValue, tab: JsValue| {
            let Some(id) = menu_item_id(&info) else {
                return;
            };
            let controller = controller.clone();
            let clicked = decode_tab(tab);
            spawn_local(async move { controller.on_clicked(&id, clicked).await });
        },
    );

    // events the loader queued before wasm was ready are replayed here
    attachListeners(
        on_init.as_ref().unchecked_ref(),
        on_shown.as_ref().unchecked_ref(),
        on_clicked.as_ref().unchecked_ref(),
    );

    on_init.forget();
    on_shown.forget();
    on_clicked.forget();
    log::debug!("Background listeners installed");
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> web_sys::Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn leftover_textareas() -> u32 {
        document().query_selector_all("textarea").unwrap().length()
    }

    #[wasm_bindgen_test]
    async fn test_dom_fallback_removes_scratch_element() {
        // the outcome depends on the browser's gesture rules; cleanup must not
        let _ = DomCopyFallback.write("https://a.test").await;

        assert_eq!(leftover_textareas(), 0);
    }

    #[wasm_bindgen_test]
    fn test_rejected_command_removes_scratch_element() {
        let result = DomCopyFallback::run_command("https://a.test", "notARealCommand");

        assert!(result.is_err());
        assert_eq!(leftover_textareas(), 0);
    }

    #[wasm_bindgen_test]
    fn test_scratch_element_lives_until_dropped() {
        let scratch = ScratchTextArea::attach(&document(), "x").unwrap();
        assert_eq!(leftover_textareas(), 1);
        assert_eq!(scratch.element.value(), "x");

        drop(scratch);

        assert_eq!(leftover_textareas(), 0);
    }

    fn event(kind: &str, args: &[JsValue]) -> JsValue {
        let entry = js_sys::Array::new();
        entry.push(&JsValue::from_str(kind));
        entry.push(&args.iter().collect::<js_sys::Array>());
        entry.into()
    }

    #[wasm_bindgen_test]
    fn test_queued_events_are_replayed_then_forwarded() {
        let seen = Rc::new(RefCell::new(Vec::<String>::new()));
        let recorder = |name: &'static str| {
            let seen = seen.clone();
            Closure::<dyn FnMut()>::new(move || seen.borrow_mut().push(name.to_string()))
        };
        let on_init = recorder("init");
        let on_shown = recorder("shown");
        let on_clicked = recorder("clicked");

        let hub = js_sys::Object::new();
        let pending = js_sys::Array::new();
        pending.push(&event("init", &[]));
        pending.push(&event("clicked", &[js_sys::Object::new().into(), JsValue::NULL]));
        js_sys::Reflect::set(&hub, &"pending".into(), &pending).unwrap();
        js_sys::Reflect::set(&hub, &"dispatch".into(), &JsValue::NULL).unwrap();
        js_sys::Reflect::set(&js_sys::global(), &"tabUrlClipperEvents".into(), &hub).unwrap();

        attachListeners(
            on_init.as_ref().unchecked_ref(),
            on_shown.as_ref().unchecked_ref(),
            on_clicked.as_ref().unchecked_ref(),
        );
        assert_eq!(*seen.borrow(), vec!["init", "clicked"]);
        assert_eq!(pending.length(), 0);

        let dispatch: js_sys::Function = js_sys::Reflect::get(&hub, &"dispatch".into())
            .unwrap()
            .dyn_into()
            .unwrap();
        let args: js_sys::Array = [js_sys::Object::new().into(), JsValue::NULL]
            .iter()
            .collect();
        dispatch
            .call2(&JsValue::NULL, &"shown".into(), &args)
            .unwrap();

        assert_eq!(*seen.borrow(), vec!["init", "clicked", "shown"]);
    }
}

/// Tab URL Clipper - copy tab URLs and open clipboard URLs from the tab context menu
/// Built with Rust + WASM + Yew

mod browser;
mod clipboard;
mod error;
mod host;
mod menu;
mod operations;
mod settings;
mod tab_data;
mod validate;
mod ui;

#[cfg(test)]
mod test_support;

use wasm_bindgen::prelude::*;

// Set up panic hook and console logging
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}

// Re-export the URL check for JavaScript access
#[wasm_bindgen]
pub fn is_valid_url(url: &str) -> bool {
    validate::is_valid_url(url)
}

// Register context menus and event listeners in the background page
#[wasm_bindgen]
pub fn start_background() {
    browser::install_listeners();
}

// Localize static text and start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    browser::localize_document(&browser::BrowserI18n);
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}

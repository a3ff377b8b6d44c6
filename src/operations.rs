/// Tab operations: copying tab URLs and opening pasted URLs
use crate::host::{ClipboardHost, KeyValueStore, TabHost};
use crate::settings::{CopyFormat, PasteBehavior, SettingsStore};
use crate::tab_data::{NewTab, TabInfo};
use crate::validate::extract_urls;

/// Decide which tabs an action applies to
///
/// A right-clicked tab outside the highlighted set is acted on alone;
/// otherwise the whole highlighted set is the target.
pub fn resolve_targets(highlighted: Vec<TabInfo>, clicked: Option<&TabInfo>) -> Vec<TabInfo> {
    match clicked {
        Some(tab) if !highlighted.iter().any(|t| t.id == tab.id) => vec![tab.clone()],
        _ => highlighted,
    }
}

/// Render one tab in the given format
pub fn render_tab(tab: &TabInfo, format: CopyFormat) -> String {
    match format {
        CopyFormat::Text => tab.url.clone(),
        CopyFormat::Markdown => format!("[{}]({})", tab.label(), tab.url),
        CopyFormat::Html => format!(
            "<a href=\"{}\">{}</a>",
            escape_html(&tab.url),
            escape_html(tab.label())
        ),
    }
}

/// Clipboard text for a set of tabs, one line per tab; `None` when there are no tabs
pub fn render_tabs(tabs: &[TabInfo], format: CopyFormat) -> Option<String> {
    if tabs.is_empty() {
        return None;
    }
    let lines: Vec<String> = tabs.iter().map(|tab| render_tab(tab, format)).collect();
    Some(lines.join("\n"))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Tabs to create for a paste, in creation order
#[derive(Debug, Clone, PartialEq)]
pub enum PastePlan {
    /// Every URL as a background tab in the current window
    CurrentWindow(Vec<String>),
    /// First URL opens a new window, the rest become background tabs there
    NewWindow { first: String, rest: Vec<String> },
}

impl PastePlan {
    pub fn url_count(&self) -> usize {
        match self {
            PastePlan::CurrentWindow(urls) => urls.len(),
            PastePlan::NewWindow { rest, .. } => rest.len() + 1,
        }
    }
}

/// Work out what a paste should open; `None` when the text holds no valid URL
pub fn plan_paste(text: &str, behavior: PasteBehavior) -> Option<PastePlan> {
    let mut urls = extract_urls(text);
    if urls.is_empty() {
        return None;
    }

    Some(match behavior {
        PasteBehavior::Current => PastePlan::CurrentWindow(urls),
        PasteBehavior::New => {
            let first = urls.remove(0);
            PastePlan::NewWindow { first, rest: urls }
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    NothingToCopy,
    Copied(usize),
    WriteFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasteOutcome {
    pub opened: usize,
    pub failed: usize,
}

/// Copy the URLs of the target tabs to the clipboard in the configured format
pub async fn copy_selected_tabs<T, C, S>(
    tabs: &T,
    clipboard: &C,
    settings: &SettingsStore<S>,
    clicked: Option<&TabInfo>,
) -> CopyOutcome
where
    T: TabHost,
    C: ClipboardHost,
    S: KeyValueStore,
{
    let highlighted = match tabs.query_highlighted().await {
        Ok(highlighted) => highlighted,
        Err(e) => {
            log::warn!("Could not query highlighted tabs: {}", e);
            Vec::new()
        }
    };
    let targets = resolve_targets(highlighted, clicked);

    if targets.is_empty() {
        return CopyOutcome::NothingToCopy;
    }

    let format = settings.get().await.copy_format;
    let Some(text) = render_tabs(&targets, format) else {
        return CopyOutcome::NothingToCopy;
    };

    match clipboard.write_text(&text).await {
        Ok(()) => {
            log::info!("Copied {} tab URL(s) as {}", targets.len(), format);
            CopyOutcome::Copied(targets.len())
        }
        Err(e) => {
            log::error!("Copy failed: {}", e);
            CopyOutcome::WriteFailed
        }
    }
}

/// Open every valid URL on the clipboard as a new tab
pub async fn paste_and_open_tabs<T, C, S>(
    tabs: &T,
    clipboard: &C,
    settings: &SettingsStore<S>,
) -> PasteOutcome
where
    T: TabHost,
    C: ClipboardHost,
    S: KeyValueStore,
{
    let text = match clipboard.read_text().await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Paste skipped, clipboard unreadable: {}", e);
            return PasteOutcome::default();
        }
    };

    let behavior = settings.get().await.paste_behavior;
    let Some(plan) = plan_paste(&text, behavior) else {
        log::debug!("Paste skipped, no valid URLs on clipboard");
        return PasteOutcome::default();
    };

    log::debug!("Opening {} pasted URL(s)", plan.url_count());
    let outcome = open_plan(tabs, plan).await;
    log::info!("Opened {} tab(s), {} failed", outcome.opened, outcome.failed);
    outcome
}

async fn open_plan<T: TabHost>(tabs: &T, plan: PastePlan) -> PasteOutcome {
    let mut outcome = PasteOutcome::default();

    let (window_id, urls) = match plan {
        PastePlan::CurrentWindow(urls) => (None, urls),
        PastePlan::NewWindow { first, rest } => match tabs.create_window(&first).await {
            Ok(window) => {
                outcome.opened += 1;
                (Some(window.id), rest)
            }
            Err(e) => {
                // remaining URLs still open, in the current window
                log::error!("Failed to open window for {}: {}", first, e);
                outcome.failed += 1;
                (None, rest)
            }
        },
    };

    for url in urls {
        match tabs.create_tab(NewTab::inactive(url.as_str()).in_window(window_id)).await {
            Ok(_) => outcome.opened += 1,
            Err(e) => {
                log::error!("Failed to open {}: {}", url, e);
                outcome.failed += 1;
            }
        }
    }

    outcome
}

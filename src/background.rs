/// Background synchronizer: mirrors tab lifecycle events into storage
///
/// The background script wires `chrome.tabs.on*` listeners straight to the
/// exported handlers below. Storage is the single source of truth: every
/// handler reads the full persisted collection, applies one registry
/// transition, and writes the result back, so interleaved handlers
/// converge under last-write-wins. Storage failures are logged and the
/// operation abandoned; the next event re-reads fresh state.
use crate::registry::TabRegistry;
use crate::storage;
use crate::tab_data::HostTab;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabs(filter: JsValue) -> Result<JsValue, JsValue>;
}

fn parse_host_tab(payload: JsValue) -> Option<HostTab> {
    match serde_wasm_bindgen::from_value(payload) {
        Ok(tab) => Some(tab),
        Err(e) => {
            log::warn!("Unparseable tab payload: {e:?}");
            None
        }
    }
}

/// Read-modify-write: load the collection, apply one transition, persist
/// only when something actually changed.
async fn with_registry(apply: impl FnOnce(&mut TabRegistry) -> bool) {
    let mut registry = match storage::load_tabs().await {
        Ok(tabs) => TabRegistry::new(tabs),
        Err(e) => {
            log::error!("Skipping tab event: {e}");
            return;
        }
    };

    if !apply(&mut registry) {
        return;
    }

    if let Err(e) = storage::save_tabs(&registry.tabs).await {
        log::error!("Failed to persist tab collection: {e}");
    }
}

/// `chrome.tabs.onCreated`
#[wasm_bindgen(js_name = onTabCreated)]
pub async fn on_tab_created(tab: JsValue) {
    let Some(event) = parse_host_tab(tab) else {
        return;
    };
    let now = js_sys::Date::now();

    with_registry(|registry| {
        let added = registry.apply_created(&event, now);
        if added {
            log::debug!("Tab added: {:?}", event.id);
        }
        added
    })
    .await;
}

/// `chrome.tabs.onUpdated`, acted on only once the navigation completed.
#[wasm_bindgen(js_name = onTabUpdated)]
pub async fn on_tab_updated(tab_id: i32, tab: JsValue) {
    let Some(event) = parse_host_tab(tab) else {
        return;
    };
    if event.status.as_deref() != Some("complete") {
        return;
    }
    let now = js_sys::Date::now();

    with_registry(|registry| registry.apply_updated(tab_id, &event, now)).await;
}

/// `chrome.tabs.onActivated`: round-trip to the host for the tab's current
/// metadata, then refresh only `lastAccessed`.
#[wasm_bindgen(js_name = onTabActivated)]
pub async fn on_tab_activated(tab_id: i32) {
    let last_accessed = match getTab(tab_id).await {
        Ok(payload) => parse_host_tab(payload)
            .and_then(|t| t.last_accessed)
            .unwrap_or_else(js_sys::Date::now),
        Err(e) => {
            // The tab can be gone by the time we look it up.
            log::debug!("Tab {tab_id} lookup failed: {e:?}");
            return;
        }
    };

    with_registry(|registry| registry.apply_activated(tab_id, last_accessed)).await;
}

/// `chrome.tabs.onRemoved`: idempotent, may race the popup's write-through.
#[wasm_bindgen(js_name = onTabRemoved)]
pub async fn on_tab_removed(tab_id: i32) {
    with_registry(|registry| {
        let removed = registry.apply_removed(tab_id);
        if removed {
            log::debug!("Tab removed: {tab_id}");
        }
        removed
    })
    .await;
}

/// `chrome.runtime.onInstalled` / service worker startup: rebuild the
/// mirror from a full host enumeration and seed the default threshold.
#[wasm_bindgen(js_name = initBackground)]
pub async fn init_background() {
    let open_tabs = match queryTabs(JsValue::NULL).await {
        Ok(payload) => match serde_wasm_bindgen::from_value::<Vec<HostTab>>(payload) {
            Ok(tabs) => tabs,
            Err(e) => {
                log::error!("Unparseable tab enumeration: {e:?}");
                return;
            }
        },
        Err(e) => {
            log::error!("Failed to enumerate tabs: {e:?}");
            return;
        }
    };

    let registry = TabRegistry::rebuild(&open_tabs, js_sys::Date::now());
    log::debug!("Rebuilt registry with {} tabs", registry.tabs.len());

    if let Err(e) = storage::save_tabs(&registry.tabs).await {
        log::error!("Failed to persist rebuilt collection: {e}");
    }
    if let Err(e) = storage::ensure_threshold().await {
        log::error!("Failed to seed threshold: {e}");
    }
}

/// Chunked persistence for the tab collection and threshold
///
/// `chrome.storage.local` caps the size of a single stored value, so the
/// collection is split across numbered chunk keys with a separate count
/// key. The split/assemble logic is pure and tested here; the async glue
/// at the bottom talks to the storage bridge.
use crate::tab_data::{InactivityThreshold, TabRecord};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Legacy single-value key, still read as a fallback but never written.
pub const KEY_TABS: &str = "tabs";
pub const KEY_CHUNK_COUNT: &str = "totalTabChunks";
pub const KEY_THRESHOLD: &str = "inactivityThreshold";

/// Per-item budget in serialized bytes, under Chrome's 8192-byte
/// QUOTA_BYTES_PER_ITEM.
pub const CHUNK_BYTE_LIMIT: usize = 8_000;

pub fn chunk_key(index: usize) -> String {
    format!("tabs_chunk_{index}")
}

fn serialized_len<T: Serialize>(value: &T) -> usize {
    serde_json::to_string(value).map(|s| s.len()).unwrap_or(0)
}

/// Split the collection into chunks whose serialized JSON stays under
/// `limit`. A record too large to share a chunk still gets one of its own;
/// the storage layer rejects it, not this planner.
pub fn split_into_chunks(tabs: &[TabRecord], limit: usize) -> Vec<Vec<TabRecord>> {
    let mut chunks: Vec<Vec<TabRecord>> = Vec::new();
    let mut current: Vec<TabRecord> = Vec::new();
    let mut current_len = 2; // "[]"

    for tab in tabs {
        let item_len = serialized_len(tab) + 1; // trailing comma
        if !current.is_empty() && current_len + item_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 2;
        }
        current_len += item_len;
        current.push(tab.clone());
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Reassemble fetched chunks into a single collection, in chunk-index
/// order regardless of the order the fetches completed in.
pub fn assemble_chunks(mut chunks: Vec<(usize, Vec<TabRecord>)>) -> Vec<TabRecord> {
    chunks.sort_by_key(|(index, _)| *index);
    chunks.into_iter().flat_map(|(_, tabs)| tabs).collect()
}

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(keys: JsValue) -> Result<(), JsValue>;
}

async fn read_key<T: serde::de::DeserializeOwned>(key: &str) -> Result<Option<T>, String> {
    let value = getStorage(key)
        .await
        .map_err(|e| format!("Failed to read {key}: {e:?}"))?;

    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| format!("Failed to parse {key}: {e:?}"))
}

async fn write_key<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let value = serde_wasm_bindgen::to_value(value)
        .map_err(|e| format!("Failed to serialize {key}: {e:?}"))?;

    setStorage(key, value)
        .await
        .map_err(|e| format!("Failed to write {key}: {e:?}"))
}

async fn read_chunk(index: usize) -> Result<(usize, Vec<TabRecord>), String> {
    let tabs = read_key::<Vec<TabRecord>>(&chunk_key(index))
        .await?
        .unwrap_or_default();
    Ok((index, tabs))
}

/// Load the persisted collection. Chunked layout wins when present; the
/// legacy single key is the fallback; nothing stored means an empty
/// collection, not an error.
pub async fn load_tabs() -> Result<Vec<TabRecord>, String> {
    match read_key::<usize>(KEY_CHUNK_COUNT).await? {
        Some(count) => {
            // All chunks in flight at once; assembly restores index order.
            let fetches = (0..count).map(read_chunk);
            let chunks = futures::future::try_join_all(fetches).await?;
            Ok(assemble_chunks(chunks))
        }
        None => Ok(read_key::<Vec<TabRecord>>(KEY_TABS).await?.unwrap_or_default()),
    }
}

/// Persist the full collection in chunked form, clearing chunk keys left
/// over from a previous, larger write and the legacy key.
pub async fn save_tabs(tabs: &[TabRecord]) -> Result<(), String> {
    let previous_count = read_key::<usize>(KEY_CHUNK_COUNT).await?.unwrap_or(0);

    let chunks = split_into_chunks(tabs, CHUNK_BYTE_LIMIT);
    for (index, chunk) in chunks.iter().enumerate() {
        write_key(&chunk_key(index), chunk).await?;
    }
    write_key(KEY_CHUNK_COUNT, &chunks.len()).await?;

    let mut stale: Vec<String> = (chunks.len()..previous_count).map(chunk_key).collect();
    stale.push(KEY_TABS.to_string());

    let stale = serde_wasm_bindgen::to_value(&stale)
        .map_err(|e| format!("Failed to serialize stale keys: {e:?}"))?;
    removeStorage(stale)
        .await
        .map_err(|e| format!("Failed to clear stale keys: {e:?}"))
}

/// Read the threshold, defaulting when absent or out of range.
pub async fn load_threshold() -> Result<InactivityThreshold, String> {
    Ok(read_key::<InactivityThreshold>(KEY_THRESHOLD)
        .await?
        .filter(InactivityThreshold::is_valid)
        .unwrap_or_default())
}

/// Persist a threshold. Out-of-range values are rejected before any write,
/// so the stored value is never partially updated.
pub async fn save_threshold(threshold: InactivityThreshold) -> Result<(), String> {
    if !threshold.is_valid() {
        return Err(format!(
            "Invalid threshold: {}h {}m",
            threshold.hours, threshold.minutes
        ));
    }
    write_key(KEY_THRESHOLD, &threshold).await
}

/// First-run initialization: write the default threshold only when nothing
/// is stored yet.
pub async fn ensure_threshold() -> Result<(), String> {
    if read_key::<InactivityThreshold>(KEY_THRESHOLD).await?.is_none() {
        write_key(KEY_THRESHOLD, &InactivityThreshold::default()).await?;
    }
    Ok(())
}

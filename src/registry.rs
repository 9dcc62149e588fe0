/// Tab registry: the pure state transitions behind the background synchronizer
///
/// Each `chrome.tabs` lifecycle event maps to exactly one method here. The
/// background handlers read the persisted collection, apply one transition,
/// and write the result back, so these methods carry all of the mirroring
/// logic and none of the I/O.
use crate::tab_data::{HostTab, TabRecord};

/// The persisted collection of known tabs. Invariant: at most one record
/// per tab id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabRegistry {
    pub tabs: Vec<TabRecord>,
}

impl TabRegistry {
    pub fn new(tabs: Vec<TabRecord>) -> TabRegistry {
        TabRegistry { tabs }
    }

    pub fn find(&self, id: i32) -> Option<&TabRecord> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// `tabs.onCreated`: append a record for the new tab, defaulting the
    /// fields the browser has not populated yet.
    pub fn apply_created(&mut self, event: &HostTab, now: f64) -> bool {
        let Some(id) = event.id else {
            return false;
        };
        if self.find(id).is_some() {
            // Already mirrored (e.g. startup enumeration raced the event).
            return false;
        }

        self.tabs.push(TabRecord::new(
            id,
            event
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "New Tab".to_string()),
            event.url.clone().unwrap_or_default(),
            event.fav_icon_url.clone().unwrap_or_default(),
            event.last_accessed.unwrap_or(now),
        ));
        true
    }

    /// `tabs.onUpdated` with `status == "complete"`: merge non-empty incoming
    /// fields over the stored record and refresh `lastAccessed`.
    ///
    /// An unknown id gets a fresh record instead of being dropped: the tab
    /// may predate the listener, and inserting keeps the mirror converging.
    pub fn apply_updated(&mut self, id: i32, event: &HostTab, now: f64) -> bool {
        let last_accessed = event.last_accessed.unwrap_or(now);

        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(record) => {
                if let Some(title) = event.title.as_ref().filter(|t| !t.is_empty()) {
                    record.title = title.clone();
                }
                if let Some(url) = event.url.as_ref().filter(|u| !u.is_empty()) {
                    record.url = url.clone();
                }
                if let Some(favicon) = event.fav_icon_url.as_ref().filter(|f| !f.is_empty()) {
                    record.tab_favicon = favicon.clone();
                }
                record.last_accessed = last_accessed;
                true
            }
            None => {
                let mut created = event.clone();
                created.id = Some(id);
                self.apply_created(&created, now)
            }
        }
    }

    /// `tabs.onActivated`: only `lastAccessed` moves; unknown ids are a no-op.
    pub fn apply_activated(&mut self, id: i32, last_accessed: f64) -> bool {
        match self.tabs.iter_mut().find(|t| t.id == id) {
            Some(record) => {
                record.last_accessed = last_accessed;
                true
            }
            None => false,
        }
    }

    /// `tabs.onRemoved`: idempotent delete. Removing an id that is already
    /// gone (popup write-through beat the event) leaves the registry as is.
    pub fn apply_removed(&mut self, id: i32) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|t| t.id != id);
        self.tabs.len() < before
    }

    /// Install/startup: rebuild the whole mirror from a host enumeration,
    /// discarding whatever stale state was persisted.
    pub fn rebuild(enumerated: &[HostTab], now: f64) -> TabRegistry {
        let mut registry = TabRegistry::default();
        for tab in enumerated {
            registry.apply_created(tab, now);
        }
        registry
    }

    /// Drop every record not in `keep`, returning the ids that went away.
    /// Used by the popup's "remove all inactive" write-through.
    pub fn retain_ids(&mut self, keep: &[i32]) -> Vec<i32> {
        let removed: Vec<i32> = self
            .tabs
            .iter()
            .map(|t| t.id)
            .filter(|id| !keep.contains(id))
            .collect();
        self.tabs.retain(|t| keep.contains(&t.id));
        removed
    }
}

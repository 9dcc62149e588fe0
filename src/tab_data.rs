/// Data structures for Tab Habit Tracker
use serde::{Deserialize, Serialize};

/// One browser tab as persisted by the background synchronizer.
///
/// `isActive` is deliberately NOT part of this struct: it is derived by the
/// classifier every time the popup loads, so stale activity flags can never
/// be read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub tab_favicon: String,
    /// Milliseconds since the epoch, last time this tab was focused.
    pub last_accessed: f64,
}

impl TabRecord {
    pub fn new(id: i32, title: String, url: String, tab_favicon: String, last_accessed: f64) -> TabRecord {
        TabRecord {
            id,
            title,
            url,
            tab_favicon,
            last_accessed,
        }
    }
}

/// User-configured duration after which an unfocused tab counts as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactivityThreshold {
    pub hours: u32,
    pub minutes: u32,
}

impl InactivityThreshold {
    pub fn new(hours: u32, minutes: u32) -> Option<InactivityThreshold> {
        let threshold = InactivityThreshold { hours, minutes };
        threshold.is_valid().then_some(threshold)
    }

    pub fn is_valid(&self) -> bool {
        self.hours <= 23 && self.minutes <= 59
    }

    /// Threshold expressed in milliseconds, the unit `lastAccessed` uses.
    pub fn as_millis(&self) -> f64 {
        ((self.hours * 60 + self.minutes) * 60_000) as f64
    }
}

impl Default for InactivityThreshold {
    fn default() -> Self {
        InactivityThreshold {
            hours: 0,
            minutes: 30,
        }
    }
}

/// Subset of `chrome.tabs.Tab` delivered with tab lifecycle events.
///
/// Everything is optional: the browser omits fields freely (no id on
/// devtools tabs, no url before the first navigation, etc.).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTab {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub fav_icon_url: Option<String>,
    pub last_accessed: Option<f64>,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_record_creation() {
        let tab = TabRecord::new(
            1,
            "Google".to_string(),
            "https://google.com".to_string(),
            "https://google.com/favicon.ico".to_string(),
            1698508200000.0,
        );

        assert_eq!(tab.id, 1);
        assert_eq!(tab.title, "Google");
        assert_eq!(tab.url, "https://google.com");
        assert_eq!(tab.last_accessed, 1698508200000.0);
    }

    #[test]
    fn test_tab_record_wire_format_is_camel_case() {
        let tab = TabRecord::new(
            7,
            "Docs".to_string(),
            "https://docs.rs".to_string(),
            "icon.png".to_string(),
            1000.0,
        );

        let json = serde_json::to_string(&tab).unwrap();

        assert!(json.contains("\"tabFavicon\""));
        assert!(json.contains("\"lastAccessed\""));

        let back: TabRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tab);
    }

    #[test]
    fn test_threshold_default() {
        let threshold = InactivityThreshold::default();
        assert_eq!(threshold.hours, 0);
        assert_eq!(threshold.minutes, 30);
        assert_eq!(threshold.as_millis(), 1_800_000.0);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(InactivityThreshold::new(0, 0).is_some());
        assert!(InactivityThreshold::new(23, 59).is_some());
        assert!(InactivityThreshold::new(24, 0).is_none());
        assert!(InactivityThreshold::new(0, 60).is_none());
    }

    #[test]
    fn test_threshold_as_millis() {
        let threshold = InactivityThreshold::new(2, 15).unwrap();
        assert_eq!(threshold.as_millis(), (2 * 60 + 15) as f64 * 60_000.0);
    }

    #[test]
    fn test_host_tab_parses_sparse_payload() {
        let event: HostTab = serde_json::from_str(r#"{"id": 42, "status": "loading"}"#).unwrap();

        assert_eq!(event.id, Some(42));
        assert_eq!(event.status.as_deref(), Some("loading"));
        assert_eq!(event.title, None);
        assert!(!event.active);
    }

    #[test]
    fn test_host_tab_parses_full_payload() {
        let event: HostTab = serde_json::from_str(
            r#"{"id": 3, "title": "Rust", "url": "https://rust-lang.org",
                "status": "complete", "favIconUrl": "fav.ico",
                "lastAccessed": 1698508200000, "active": true}"#,
        )
        .unwrap();

        assert_eq!(event.id, Some(3));
        assert_eq!(event.fav_icon_url.as_deref(), Some("fav.ico"));
        assert_eq!(event.last_accessed, Some(1698508200000.0));
        assert!(event.active);
    }
}

/// Inactivity classification and productivity scoring
///
/// Pure functions over the loaded tab collection. The popup runs these on
/// every load and again whenever the threshold changes; nothing here is
/// persisted.
use crate::tab_data::{InactivityThreshold, TabRecord};

/// A tab is active when it was focused within the threshold window.
pub fn is_active(last_accessed: f64, now: f64, threshold_ms: f64) -> bool {
    now - last_accessed < threshold_ms
}

/// Productivity score in percent: each active tab is worth a full point,
/// each inactive tab costs half a point, normalized to the tab count and
/// clamped to 0..=100. An empty browser scores a perfect 100.
pub fn productivity_score(active_count: usize, inactive_count: usize) -> u8 {
    let total = active_count + inactive_count;
    if total == 0 {
        return 100;
    }
    let raw = (active_count as f64 - inactive_count as f64 * 0.5) / total as f64 * 100.0;
    raw.clamp(0.0, 100.0).round() as u8
}

/// The classified view of the collection the popup renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub active: Vec<TabRecord>,
    pub inactive: Vec<TabRecord>,
    pub score: u8,
}

/// Partition the collection against the threshold. A currently focused tab
/// (id present in `focused`) is always active, however stale its
/// `lastAccessed` might be.
pub fn classify(
    tabs: &[TabRecord],
    threshold: InactivityThreshold,
    now: f64,
    focused: &[i32],
) -> Classified {
    let threshold_ms = threshold.as_millis();
    let mut active = Vec::new();
    let mut inactive = Vec::new();

    for tab in tabs {
        if focused.contains(&tab.id) || is_active(tab.last_accessed, now, threshold_ms) {
            active.push(tab.clone());
        } else {
            inactive.push(tab.clone());
        }
    }

    let score = productivity_score(active.len(), inactive.len());
    Classified {
        active,
        inactive,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: f64 = 1_700_000_000_000.0;

    fn tab(id: i32, last_accessed: f64) -> TabRecord {
        TabRecord::new(
            id,
            format!("Tab {id}"),
            format!("https://example{id}.com"),
            String::new(),
            last_accessed,
        )
    }

    #[test]
    fn test_score_empty_browser_is_perfect() {
        assert_eq!(productivity_score(0, 0), 100);
    }

    #[test]
    fn test_score_all_active_is_perfect() {
        assert_eq!(productivity_score(1, 0), 100);
        assert_eq!(productivity_score(17, 0), 100);
    }

    #[test]
    fn test_score_all_inactive_clamps_to_zero() {
        // raw = -50 for any all-inactive collection
        assert_eq!(productivity_score(0, 1), 0);
        assert_eq!(productivity_score(0, 42), 0);
    }

    #[test]
    fn test_score_rounds_half_up() {
        // (3 - 0.5) / 4 * 100 = 62.5
        assert_eq!(productivity_score(3, 1), 63);
    }

    #[test]
    fn test_score_mixed() {
        // (1 - 0.5) / 2 * 100 = 25
        assert_eq!(productivity_score(1, 1), 25);
    }

    #[test]
    fn test_is_active_boundary() {
        let threshold_ms = InactivityThreshold::default().as_millis();

        assert!(is_active(NOW, NOW, threshold_ms));
        assert!(is_active(NOW - threshold_ms + 1.0, NOW, threshold_ms));
        // Exactly at the threshold counts as inactive.
        assert!(!is_active(NOW - threshold_ms, NOW, threshold_ms));
    }

    #[test]
    fn test_focused_tab_is_always_active() {
        let tabs = vec![tab(1, NOW - 86_400_000.0)]; // a day stale
        let classified = classify(&tabs, InactivityThreshold::default(), NOW, &[1]);

        assert_eq!(classified.active.len(), 1);
        assert!(classified.inactive.is_empty());
        assert_eq!(classified.score, 100);
    }

    #[test]
    fn test_classify_partitions_and_scores() {
        // Spec scenario: one fresh tab, one two hours stale, 30m threshold.
        let tabs = vec![tab(1, NOW), tab(2, NOW - 7_200_000.0)];

        let classified = classify(&tabs, InactivityThreshold::default(), NOW, &[]);

        assert_eq!(classified.active.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(classified.inactive.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(classified.score, 25);
    }

    #[test]
    fn test_threshold_change_reclassifies() {
        let tabs = vec![tab(1, NOW - 3_600_000.0)]; // an hour stale

        let tight = classify(&tabs, InactivityThreshold::new(0, 30).unwrap(), NOW, &[]);
        let loose = classify(&tabs, InactivityThreshold::new(2, 0).unwrap(), NOW, &[]);

        assert_eq!(tight.inactive.len(), 1);
        assert_eq!(loose.active.len(), 1);
    }

    #[test]
    fn test_remove_all_inactive_flow() {
        use crate::registry::TabRegistry;

        let tabs = vec![tab(1, NOW), tab(2, NOW - 7_200_000.0)];
        let classified = classify(&tabs, InactivityThreshold::default(), NOW, &[]);
        let keep: Vec<i32> = classified.active.iter().map(|t| t.id).collect();

        let mut registry = TabRegistry::new(tabs);
        let closed = registry.retain_ids(&keep);

        // One close request per inactive tab, active tab persists.
        assert_eq!(closed, vec![2]);
        assert_eq!(registry.tabs.len(), 1);
        assert_eq!(registry.tabs[0].id, 1);
    }

    #[test]
    fn test_classify_preserves_collection_order() {
        let tabs = vec![
            tab(3, NOW - 7_200_000.0),
            tab(1, NOW - 3_600_000.0),
            tab(2, NOW - 10_800_000.0),
        ];

        let classified = classify(&tabs, InactivityThreshold::default(), NOW, &[]);

        let ids: Vec<i32> = classified.inactive.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}

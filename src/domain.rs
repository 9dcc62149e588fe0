/// Domain extraction and grouping logic for Tab Habit Tracker
use crate::tab_data::TabRecord;

/// Bucket for tabs whose url has no usable hostname (about:blank, empty
/// urls on freshly created tabs, malformed strings).
pub const UNGROUPED: &str = "other";

/// Extract the domain from a URL with smart TLD handling
///
/// Algorithm:
/// 1. Parse URL to extract hostname
/// 2. Split hostname by "."
/// 3. Get last segment (TLD)
/// 4. If TLD is 2 letters AND second-to-last is "co" or "com":
///    → Return last 3 segments (e.g., "example.com.au", "site.co.uk")
/// 5. Else:
///    → Return last 2 segments (e.g., "microsoft.com", "zinfandel.io")
/// 6. Handle edge cases (localhost, IPs, etc.)
pub fn extract_domain(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    extract_hostname(url).map(|hostname| {
        // Special cases: localhost and IP addresses
        if hostname == "localhost" || is_ip_address(&hostname) {
            return hostname;
        }

        let parts: Vec<&str> = hostname.split('.').collect();

        // Need at least 2 parts for a valid domain
        if parts.len() < 2 {
            return hostname;
        }

        // Determine if we need 3 parts (for .co.uk, .com.au style TLDs)
        let tld = parts[parts.len() - 1];
        let num_parts = if parts.len() >= 3
            && tld.len() == 2
            && matches!(parts[parts.len() - 2], "co" | "com")
        {
            3
        } else {
            2
        };

        parts[parts.len() - num_parts..].join(".")
    })
}

/// Extract hostname from a URL string, preferring a real parse and falling
/// back to string surgery for scheme-less inputs.
fn extract_hostname(raw: &str) -> Option<String> {
    if let Ok(parsed) = url::Url::parse(raw.trim()) {
        // Opaque schemes (about:blank, data:) genuinely have no host.
        return parsed.host_str().map(str::to_lowercase);
    }

    // Not an absolute URL: strip any known prefix and take everything up
    // to the first '/' or ':'.
    let url_clean = raw
        .trim()
        .replace("https://", "")
        .replace("http://", "")
        .replace("ftp://", "");

    let hostname = url_clean.split('/').next()?.split(':').next()?.to_lowercase();

    if hostname.is_empty() { None } else { Some(hostname) }
}

/// Check if a string looks like an IP address
fn is_ip_address(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// One rendered group of inactive tabs sharing a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainGroup {
    pub domain: String,
    pub tabs: Vec<TabRecord>,
}

/// Group tabs by domain, alphabetically by domain with the catch-all
/// bucket last; within a group, collection order is preserved.
pub fn group_by_domain(tabs: &[TabRecord]) -> Vec<DomainGroup> {
    let mut groups: Vec<DomainGroup> = Vec::new();

    for tab in tabs {
        let domain = extract_domain(&tab.url).unwrap_or_else(|| UNGROUPED.to_string());
        match groups.iter_mut().find(|g| g.domain == domain) {
            Some(group) => group.tabs.push(tab.clone()),
            None => groups.push(DomainGroup {
                domain,
                tabs: vec![tab.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| {
        (a.domain == UNGROUPED)
            .cmp(&(b.domain == UNGROUPED))
            .then_with(|| a.domain.cmp(&b.domain))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: i32, url: &str) -> TabRecord {
        TabRecord::new(id, format!("Tab {id}"), url.to_string(), String::new(), 0.0)
    }

    #[test]
    fn test_extract_domain_basic() {
        assert_eq!(extract_domain("https://www.google.com"), Some("google.com".to_string()));
        assert_eq!(extract_domain("https://google.com"), Some("google.com".to_string()));
        assert_eq!(extract_domain("http://google.com"), Some("google.com".to_string()));
    }

    #[test]
    fn test_extract_domain_subdomains() {
        assert_eq!(extract_domain("https://ai.microsoft.com"), Some("microsoft.com".to_string()));
        assert_eq!(extract_domain("https://docs.microsoft.com"), Some("microsoft.com".to_string()));
        assert_eq!(extract_domain("https://www.microsoft.com"), Some("microsoft.com".to_string()));
    }

    #[test]
    fn test_extract_domain_with_path() {
        assert_eq!(
            extract_domain("https://www.google.com/search?q=rust"),
            Some("google.com".to_string())
        );
        assert_eq!(
            extract_domain("https://github.com/rust-lang/rust"),
            Some("github.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_country_tlds() {
        assert_eq!(extract_domain("https://news.bbc.co.uk"), Some("bbc.co.uk".to_string()));
        assert_eq!(
            extract_domain("https://shop.example.com.au"),
            Some("example.com.au".to_string())
        );
    }

    #[test]
    fn test_extract_domain_special_cases() {
        assert_eq!(extract_domain("https://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(extract_domain("http://127.0.0.1:8080"), Some("127.0.0.1".to_string()));
        assert_eq!(extract_domain("https://192.168.1.1"), Some("192.168.1.1".to_string()));
    }

    #[test]
    fn test_extract_domain_edge_cases() {
        assert_eq!(extract_domain(""), None);
        assert_eq!(extract_domain("not-a-url"), Some("not-a-url".to_string()));
        assert_eq!(extract_domain("https://"), None);
    }

    #[test]
    fn test_group_by_domain_orders_groups_alphabetically() {
        let tabs = vec![
            tab(1, "https://www.google.com/search"),
            tab(2, "https://github.com/rust-lang"),
            tab(3, "https://mail.google.com"),
        ];

        let groups = group_by_domain(&tabs);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].domain, "github.com");
        assert_eq!(groups[1].domain, "google.com");
        assert_eq!(groups[1].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_group_by_domain_malformed_urls_fall_into_catch_all() {
        let tabs = vec![
            tab(1, ""),
            tab(2, "https://github.com"),
            tab(3, "about:blank"),
        ];

        let groups = group_by_domain(&tabs);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].domain, "github.com");
        assert_eq!(groups[1].domain, UNGROUPED);
        assert_eq!(groups[1].tabs.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_group_by_domain_empty_collection() {
        assert!(group_by_domain(&[]).is_empty());
    }
}

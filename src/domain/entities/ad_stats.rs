//! Per-ad view and click counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Counters for a single ad.
///
/// `views` counts unique viewers and always equals `viewers.len()`; use
/// [`AdStats::add_viewer`] instead of touching the fields directly.
/// `clicks` counts every click event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdStats {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub viewers: BTreeSet<String>,
}

impl AdStats {
    /// Records `client_key` as a viewer.
    ///
    /// Returns `true` if the key was new and `views` was incremented.
    pub fn add_viewer(&mut self, client_key: &str) -> bool {
        if self.viewers.contains(client_key) {
            return false;
        }

        self.viewers.insert(client_key.to_string());
        self.views = self.viewers.len() as u64;
        true
    }

    /// Realigns `views` with the viewer set.
    ///
    /// Returns `true` if the persisted record was inconsistent.
    pub fn repair(&mut self) -> bool {
        let actual = self.viewers.len() as u64;
        if self.views == actual {
            return false;
        }

        self.views = actual;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_viewer_counted_once() {
        let mut stats = AdStats::default();

        assert!(stats.add_viewer("1.1.1.1"));
        assert!(!stats.add_viewer("1.1.1.1"));
        assert!(!stats.add_viewer("1.1.1.1"));

        assert_eq!(stats.views, 1);
        assert_eq!(stats.viewers.len(), 1);
    }

    #[test]
    fn test_distinct_viewers() {
        let mut stats = AdStats::default();
        stats.add_viewer("viewer-a");
        stats.add_viewer("viewer-b");

        assert_eq!(stats.views, 2);
    }

    #[test]
    fn test_repair_inconsistent_record() {
        // Older files stored viewers as a JSON array; duplicates collapse on load.
        let json = r#"{"views": 5, "clicks": 2, "viewers": ["a", "b", "b"]}"#;
        let mut stats: AdStats = serde_json::from_str(json).unwrap();

        assert!(stats.repair());
        assert_eq!(stats.views, 2);
        assert_eq!(stats.clicks, 2);
        assert!(!stats.repair());
    }
}

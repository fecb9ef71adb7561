//! Per-language translation cache and missing-key set.
//!
//! Both live inside the active language state and are dropped with it when
//! the language changes. Each lock is held for a single lookup or insert.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// Memo of full input text to final output text
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: Mutex<HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        TranslationCache::default()
    }

    pub fn get(&self, input: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(input)
            .cloned()
    }

    /// Publish `output` for `input` unless another caller got there first.
    ///
    /// Returns the value that is now cached, so concurrent callers computing
    /// the same input all hand out the first published result.
    pub fn publish(&self, input: &str, output: String) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(input.to_string())
            .or_insert(output)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keys that failed every resolution step, recorded once each
#[derive(Debug, Default)]
pub struct MissingKeySet {
    keys: Mutex<HashSet<String>>,
}

impl MissingKeySet {
    pub fn new() -> Self {
        MissingKeySet::default()
    }

    /// Record a key, returning `true` only the first time it is seen.
    pub fn record(&self, key: &str) -> bool {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).contains(key)
    }

    /// Recorded keys in sorted order.
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_writer_wins() {
        let cache = TranslationCache::new();
        assert_eq!(cache.get("Open"), None);
        assert_eq!(cache.publish("Open", "Öffnen".to_string()), "Öffnen");
        assert_eq!(cache.publish("Open", "Aufmachen".to_string()), "Öffnen");
        assert_eq!(cache.get("Open").as_deref(), Some("Öffnen"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_key_recorded_once() {
        let missing = MissingKeySet::new();
        assert!(missing.record("Unknown line."));
        assert!(!missing.record("Unknown line."));
        assert!(missing.contains("Unknown line."));
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let missing = MissingKeySet::new();
        missing.record("b");
        missing.record("a");
        assert_eq!(missing.snapshot(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_record_reports_once() {
        let missing = Arc::new(MissingKeySet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let missing = Arc::clone(&missing);
                thread::spawn(move || missing.record("same key"))
            })
            .collect();
        let firsts = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|first| *first)
            .count();
        assert_eq!(firsts, 1);
    }
}

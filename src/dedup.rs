//! Idempotency-key tracking for at-most-once delivery.
//!
//! Each buffered strategy owns one [`SeenKeys`] set for its whole
//! lifetime. Keys are never evicted: a long-lived stream or webhook
//! strategy grows this set monotonically. Deployments with unbounded key
//! spaces should watch [`SeenKeys::len`] and recycle the strategy when it
//! grows past their comfort.

use parking_lot::Mutex;
use std::collections::HashSet;

/// Concurrent set of idempotency keys scoped to one strategy instance.
pub struct SeenKeys {
    keys: Mutex<HashSet<String>>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashSet::new()),
        }
    }

    /// Record `key` and report whether this is its first sighting.
    ///
    /// Returns `true` exactly once per key: the check and the insertion
    /// are a single atomic step, so two concurrent deliveries of the same
    /// key cannot both be first.
    pub fn first_sighting(&self, key: &str) -> bool {
        let mut keys = self.keys.lock();
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.to_string());
        true
    }

    /// Number of distinct keys seen so far.
    ///
    /// A snapshot; the value may change immediately after under
    /// concurrent ingestion.
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }
}

impl Default for SeenKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_sighting_per_key() {
        let seen = SeenKeys::new();

        assert!(seen.first_sighting("a"));
        assert!(!seen.first_sighting("a"));
        assert!(seen.first_sighting("b"));
        assert!(!seen.first_sighting("b"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_keys_are_never_forgotten() {
        let seen = SeenKeys::new();
        for _ in 0..3 {
            seen.first_sighting("sticky");
        }
        assert_eq!(seen.len(), 1);
        assert!(!seen.first_sighting("sticky"));
    }

    #[test]
    fn test_concurrent_same_key_has_one_winner() {
        let seen = Arc::new(SeenKeys::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let seen = Arc::clone(&seen);
            handles.push(thread::spawn(move || seen.first_sighting("same-key")));
        }

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|&&first| first).count();
        assert_eq!(winners, 1, "expected exactly 1 first sighting, got {winners}");
    }
}

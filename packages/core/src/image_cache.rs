//! Explicitly owned record of which artwork images have finished loading
//!
//! Views use it to skip fade-in placeholders for images already shown once.
//! The cache is unbounded unless a capacity is given, in which case the least
//! recently used keys are forgotten first.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct ImageLoadCache {
    capacity: Option<usize>,
    loaded: HashSet<String>,
    // Most recently used at the front
    recency: VecDeque<String>,
}

impl ImageLoadCache {
    /// Cache without eviction
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cache keeping at most `capacity` keys (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(existing) = self.recency.remove(pos) {
                self.recency.push_front(existing);
            }
        }
    }

    /// Record that `key` finished loading
    pub fn mark_loaded(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.loaded.contains(&key) {
            self.touch(&key);
            return;
        }

        if let Some(capacity) = self.capacity {
            if self.loaded.len() >= capacity {
                if let Some(evicted) = self.recency.pop_back() {
                    self.loaded.remove(&evicted);
                }
            }
        }

        self.loaded.insert(key.clone());
        self.recency.push_front(key);
    }

    /// Whether `key` is known to be loaded; refreshes its recency
    pub fn is_loaded(&mut self, key: &str) -> bool {
        if self.loaded.contains(key) {
            self.touch(key);
            true
        } else {
            false
        }
    }

    pub fn forget(&mut self, key: &str) -> bool {
        if !self.loaded.remove(key) {
            return false;
        }
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
        }
        true
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
        self.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut cache = ImageLoadCache::unbounded();
        for i in 0..500 {
            cache.mark_loaded(format!("poster-{}", i));
        }
        assert_eq!(cache.len(), 500);
        assert!(cache.is_loaded("poster-0"));
        assert_eq!(cache.capacity(), None);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = ImageLoadCache::with_capacity(2);
        cache.mark_loaded("a");
        cache.mark_loaded("b");
        // Touch "a" so "b" becomes the eviction candidate
        assert!(cache.is_loaded("a"));
        cache.mark_loaded("c");

        assert!(cache.is_loaded("a"));
        assert!(!cache.is_loaded("b"));
        assert!(cache.is_loaded("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_remarking_does_not_grow() {
        let mut cache = ImageLoadCache::with_capacity(3);
        cache.mark_loaded("a");
        cache.mark_loaded("a");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_forget_and_clear() {
        let mut cache = ImageLoadCache::with_capacity(3);
        cache.mark_loaded("a");
        cache.mark_loaded("b");
        assert!(cache.forget("a"));
        assert!(!cache.forget("a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}

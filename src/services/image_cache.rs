use std::collections::HashMap;
use std::sync::Mutex;

const DEFAULT_CAPACITY: usize = 512;

/// Process-wide cache of stock-photo lookups, keyed by lowercased query.
/// Append-only: at capacity, new queries simply go uncached. A duplicate
/// network call while two requests race to populate the same key is
/// harmless; the values are idempotent for a given query.
pub struct ImageCache {
    entries: Mutex<HashMap<String, String>>,
    capacity: usize,
}

impl ImageCache {
    /// A cache with `capacity` zero never stores anything, which makes it a
    /// drop-in no-op for tests.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn get(&self, query: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("image cache lock poisoned")
            .get(&query.to_lowercase())
            .cloned()
    }

    pub fn put(&self, query: &str, url: &str) {
        let key = query.to_lowercase();
        let mut entries = self.entries.lock().expect("image cache lock poisoned");
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            return;
        }
        entries.insert(key, url.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("image cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Default number of transcripts kept in memory
pub const MAX_TRANSCRIPT_CACHE: usize = 50;

/// Default number of video titles kept in memory
pub const MAX_TITLE_CACHE: usize = 128;

/// Video ID -> transcript text
pub type TranscriptCache = LruCache<String>;

/// Bounded, thread-safe least-recently-used cache keyed by string
///
/// Both `get` and `put` count as a touch. Every operation runs under a single
/// mutex, so callers never observe a half-updated recency order.
pub struct LruCache<V> {
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    /// touch tick -> key, oldest first
    recency: BTreeMap<u64, String>,
    tick: u64,
}

struct Entry<V> {
    value: V,
    touched: u64,
}

impl<V> Inner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                tick: 0,
            }),
        }
    }

    /// Look up a value and mark it as most recently used
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.lock();
        let tick = inner.next_tick();
        let Inner {
            entries, recency, ..
        } = &mut *inner;

        let entry = entries.get_mut(key)?;
        recency.remove(&entry.touched);
        recency.insert(tick, key.to_string());
        entry.touched = tick;

        Some(entry.value.clone())
    }

    /// Insert or overwrite a value, evicting the least recently used entry when full
    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.lock();
        let tick = inner.next_tick();

        if let Some(previous) = inner.entries.insert(
            key.clone(),
            Entry {
                value,
                touched: tick,
            },
        ) {
            inner.recency.remove(&previous.touched);
        }
        inner.recency.insert(tick, key);

        while inner.entries.len() > self.capacity {
            let Some((_, oldest)) = inner.recency.pop_first() else {
                break;
            };
            inner.entries.remove(&oldest);
            tracing::trace!(key = %oldest, "evicted cache entry");
        }
    }

    /// Check for a key without touching its recency
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        // The maps are updated together before any call that could panic,
        // so a poisoned guard still holds a consistent state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

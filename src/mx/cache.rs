use std::collections::HashMap;

/// Per-batch memo of MX verdicts, keyed by lowercased domain.
///
/// Entries never expire; drop the cache to forget them. One cache must not be
/// shared between unrelated batches.
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    entries: HashMap<String, bool>,
    hits: u64,
    misses: u64,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a verdict without touching the hit/miss counters.
    pub fn peek(&self, domain: &str) -> Option<bool> {
        self.entries.get(&super::resolver::cache_key(domain)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    // `key` must already be a cache key
    pub(crate) fn lookup(&mut self, key: &str) -> Option<bool> {
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub(crate) fn store(&mut self, key: String, has_mx: bool) {
        self.entries.insert(key, has_mx);
    }
}

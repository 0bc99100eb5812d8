//! Single-entry generation cache.
//!
//! Holds the table generated for the most recent key. Asking again with an
//! equal key returns the stored table; any other key replaces it.
//! No eviction beyond that: one entry, owned by whoever holds the cache.

pub struct GenerationCache<K, V> {
    entry:       Option<(K, V)>,
    hits:        u64,
    generations: u64,
}

impl<K: PartialEq + Clone, V> GenerationCache<K, V> {
    pub fn new() -> Self {
        Self { entry: None, hits: 0, generations: 0 }
    }

    /// Return the cached value for `key`, generating it first when the
    /// cache is empty or holds a different key.
    pub fn get_or_generate<F>(&mut self, key: &K, generate: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        let entry = match self.entry.take() {
            Some((cached, value)) if cached == *key => {
                self.hits += 1;
                (cached, value)
            }
            _ => {
                self.generations += 1;
                (key.clone(), generate(key))
            }
        };
        &self.entry.insert(entry).1
    }

    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.entry {
            Some((cached, value)) if cached == key => Some(value),
            _ => None,
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }
}

impl<K: PartialEq + Clone, V> Default for GenerationCache<K, V> {
    fn default() -> Self { Self::new() }
}

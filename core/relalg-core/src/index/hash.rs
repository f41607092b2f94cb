//! Hash index for fast key lookups
//!
//! Provides O(1) primary-key lookup performance.

use super::{IndexKind, KeyIndex};
use crate::types::CompositeKey;
use ahash::AHashMap;

/// Hash index structure: key → row position
#[derive(Debug, Default)]
pub struct HashIndex {
    entries: AHashMap<CompositeKey, usize>,
}

impl HashIndex {
    /// Create a new empty hash index
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }
}

impl KeyIndex for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn put(&mut self, key: CompositeKey, row: usize) -> Option<usize> {
        self.entries.insert(key, row)
    }

    fn get(&self, key: &CompositeKey) -> Option<usize> {
        self.entries.get(key).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries ordered by row position, since hash order is arbitrary
    fn entries(&self) -> Vec<(CompositeKey, usize)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, &r)| (k.clone(), r)).collect();
        entries.sort_by_key(|&(_, row)| row);
        entries
    }
}

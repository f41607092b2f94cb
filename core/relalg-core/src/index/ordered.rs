//! Ordered index backed by a B-tree map
//!
//! O(log n) lookups; entries iterate in key order.

use super::{IndexKind, KeyIndex};
use crate::types::CompositeKey;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct OrderedIndex {
    entries: BTreeMap<CompositeKey, usize>,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl KeyIndex for OrderedIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Ordered
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

    fn entries(&self) -> Vec<(CompositeKey, usize)> {
        self.entries.iter().map(|(k, &r)| (k.clone(), r)).collect()
    }
}

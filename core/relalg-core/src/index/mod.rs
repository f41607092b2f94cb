//! Primary-key index: pluggable `CompositeKey → row` mapping.
//!
//! A table picks its strategy at construction time through [`IndexKind`].
//! Entries map a key to the row's position in the owning table's tuple
//! vector; the tuple itself stays owned by the table.

mod hash;
mod ordered;

pub use hash::HashIndex;
pub use ordered::OrderedIndex;

use crate::error::{RelError, RelResult};
use crate::types::CompositeKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available index strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexKind {
    /// No index; key lookups scan the tuples
    #[default]
    None,
    /// Ordered map (B-tree), O(log n) lookups, entries in key order
    Ordered,
    /// Hash map, O(1) lookups
    Hash,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::None => "none",
            IndexKind::Ordered => "ordered",
            IndexKind::Hash => "hash",
        }
    }

    /// Parse a configuration token (`none`, `ordered`/`tree`, `hash`)
    pub fn parse_kind(s: &str) -> RelResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "no_map" => Ok(IndexKind::None),
            "ordered" | "tree" | "tree_map" => Ok(IndexKind::Ordered),
            "hash" | "hash_map" => Ok(IndexKind::Hash),
            other => Err(RelError::Config(format!("unknown index kind: {other}"))),
        }
    }

    /// Instantiate an empty index of this kind
    pub fn build(self) -> Box<dyn KeyIndex> {
        match self {
            IndexKind::None => Box::new(NoIndex),
            IndexKind::Ordered => Box::new(OrderedIndex::new()),
            IndexKind::Hash => Box::new(HashIndex::new()),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index interface every strategy implements.
///
/// # Contract
///
/// - `put`: upsert; returns the row previously mapped to `key`.
/// - `get`: `None` for absent keys, never errors.
/// - `entries`: every mapping, in the strategy's natural order.
pub trait KeyIndex: fmt::Debug + Send + Sync {
    fn kind(&self) -> IndexKind;

    fn put(&mut self, key: CompositeKey, row: usize) -> Option<usize>;

    fn get(&self, key: &CompositeKey) -> Option<usize>;

    fn len(&self) -> usize;

    fn entries(&self) -> Vec<(CompositeKey, usize)>;

    fn contains(&self, key: &CompositeKey) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether lookups go through this index at all
    fn is_enabled(&self) -> bool {
        self.kind() != IndexKind::None
    }
}

/// The "no index" strategy: stores nothing.
#[derive(Debug, Default)]
pub struct NoIndex;

impl KeyIndex for NoIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::None
    }

    fn put(&mut self, _key: CompositeKey, _row: usize) -> Option<usize> {
        None
    }

    fn get(&self, _key: &CompositeKey) -> Option<usize> {
        None
    }

    fn len(&self) -> usize {
        0
    }

    fn entries(&self) -> Vec<(CompositeKey, usize)> {
        Vec::new()
    }
}

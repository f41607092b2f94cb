//! Composite keys

use crate::types::Value;
use smallvec::SmallVec;
use std::fmt;

/// Immutable ordered tuple of values drawn from one or more columns.
///
/// Equal iff same length and element-wise equal; ordered lexicographically.
/// Serves as primary-key identity, join predicate and key-select argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(SmallVec<[Value; 4]>);

impl CompositeKey {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self(values.into_iter().collect())
    }

    /// Extract the values at `positions` from `tuple`.
    ///
    /// `positions` must have been resolved against the tuple's schema.
    pub fn from_tuple(tuple: &[Value], positions: &[usize]) -> Self {
        Self(positions.iter().map(|&p| tuple[p].clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for CompositeKey {
    fn from(values: Vec<Value>) -> Self {
        Self(SmallVec::from_vec(values))
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::types::format_tuple(&self.0))
    }
}

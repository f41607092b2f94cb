//! Relational tables: schema, tuples and primary-key index.
//!
//! # Data flow
//!
//! - **insert**: type-check → duplicate-key check → append → index
//! - **operators** (`project`, `select`, `union`, `minus`, `join`, ...):
//!   read their operands and materialize a fresh table with a generated name
//!
//! # Example
//!
//! ```rust
//! use relalg_core::{Table, Value, tuple};
//!
//! # fn main() -> relalg_core::RelResult<()> {
//! let mut movie = Table::new("movie", "title year genre", "String Integer String", "title year")?;
//! movie.insert(tuple!["Star_Wars", 1977, "sciFi"])?;
//! movie.insert(tuple!["Rocky", 1985, "action"])?;
//!
//! let year = movie.col("year").unwrap();
//! let old = movie.select(|t| t[year] == Value::Integer(1977));
//! assert_eq!(old.len(), 1);
//! # Ok(())
//! # }
//! ```

mod algebra;
mod display;
mod join;

pub use join::JoinStrategy;

use crate::config::EngineConfig;
use crate::error::{RelError, RelResult};
use crate::index::{IndexKind, KeyIndex};
use crate::schema::Schema;
use crate::types::{CompositeKey, Row, Tuple, Value, format_tuple};
use ahash::AHashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Counter for naming temporary (derived) tables.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// `base` followed by a process-wide sequence number.
pub(crate) fn temp_name(base: &str) -> String {
    format!("{}{}", base, TEMP_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// A named relation: schema, tuples in insertion order and a key index.
#[derive(Debug)]
pub struct Table {
    name: String,
    schema: Schema,
    tuples: Vec<Tuple>,
    index: Box<dyn KeyIndex>,
    /// False when a derived table holds two rows with the same key
    key_unique: bool,
}

impl Table {
    // ════════════════════════════════════════════
    // Constructors
    // ════════════════════════════════════════════

    /// Create an empty table from whitespace-separated schema strings.
    ///
    /// An unknown domain token or an invalid key is a [`RelError::Schema`].
    pub fn new(name: &str, attributes: &str, domains: &str, key: &str) -> RelResult<Self> {
        Self::with_index(name, attributes, domains, key, IndexKind::None)
    }

    /// Like [`Table::new`], with an explicit index strategy.
    pub fn with_index(
        name: &str,
        attributes: &str,
        domains: &str,
        key: &str,
        index: IndexKind,
    ) -> RelResult<Self> {
        let schema = Schema::parse(attributes, domains, key)?;
        debug!(target: "relalg::ddl", "DDL> create table {} ({})", name, attributes);
        Ok(Self::empty(name, schema, index))
    }

    /// Like [`Table::new`], taking the index strategy from `config`.
    pub fn with_config(
        name: &str,
        attributes: &str,
        domains: &str,
        key: &str,
        config: &EngineConfig,
    ) -> RelResult<Self> {
        Self::with_index(name, attributes, domains, key, config.index)
    }

    /// Empty table over an already validated schema.
    pub fn empty(name: &str, schema: Schema, index: IndexKind) -> Self {
        Self {
            name: name.to_string(),
            schema,
            tuples: Vec::new(),
            index: index.build(),
            key_unique: true,
        }
    }

    /// Table pre-populated with caller-supplied rows.
    ///
    /// Every row goes through [`Table::insert`]; the first invalid row
    /// aborts construction.
    pub fn from_tuples(
        name: &str,
        schema: Schema,
        index: IndexKind,
        tuples: impl IntoIterator<Item = Tuple>,
    ) -> RelResult<Self> {
        let mut table = Self::empty(name, schema, index);
        for tuple in tuples {
            table.insert(tuple)?;
        }
        Ok(table)
    }

    /// Empty table shaped by a [`Row`] type.
    pub fn for_row<R: Row>() -> RelResult<Self> {
        Ok(Self::empty(R::RELATION, R::schema()?, IndexKind::None))
    }

    /// Materialize an operator result. Rows are trusted to fit `schema`.
    ///
    /// When two rows share a key the index keeps the first one.
    pub(crate) fn derived(name: String, schema: Schema, index: IndexKind, tuples: Vec<Tuple>) -> Self {
        let mut table = Self {
            name,
            schema,
            tuples,
            index: index.build(),
            key_unique: true,
        };
        table.rebuild_index();
        table
    }

    /// Index every row and record whether keys repeat.
    ///
    /// Without an index the keys still pass through a scratch set so
    /// `key_unique` holds for every index kind.
    fn rebuild_index(&mut self) {
        let key_columns = self.schema.key_columns();
        let mut seen: AHashSet<CompositeKey> = AHashSet::new();
        for (row, tuple) in self.tuples.iter().enumerate() {
            let key = CompositeKey::from_tuple(tuple, key_columns);
            let repeated = if self.index.is_enabled() {
                self.index.contains(&key)
            } else {
                !seen.insert(key.clone())
            };
            if repeated {
                debug!(target: "relalg::index", table = %self.name, key = %key, "duplicate key in derived table");
                self.key_unique = false;
            } else if self.index.is_enabled() {
                self.index.put(key, row);
            }
        }
    }

    // ════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn attributes(&self) -> &[String] {
        self.schema.attributes()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn index_kind(&self) -> IndexKind {
        self.index.kind()
    }

    pub(crate) fn index(&self) -> &dyn KeyIndex {
        self.index.as_ref()
    }

    /// Whether every row has a distinct primary key
    pub fn key_unique(&self) -> bool {
        self.key_unique
    }

    /// Column position of `attribute`
    pub fn col(&self, attribute: &str) -> Option<usize> {
        self.schema.column_of(attribute)
    }

    /// Value of `attribute` in `tuple`, which must belong to this table
    pub fn value<'a>(&self, tuple: &'a [Value], attribute: &str) -> Option<&'a Value> {
        self.col(attribute).and_then(|col| tuple.get(col))
    }

    /// Primary key of `tuple`
    pub fn key_of(&self, tuple: &[Value]) -> CompositeKey {
        CompositeKey::from_tuple(tuple, self.schema.key_columns())
    }

    /// Row position holding `key`: index probe when configured, scan otherwise.
    pub(crate) fn find_key(&self, key: &CompositeKey) -> Option<usize> {
        if self.index.is_enabled() {
            return self.index.get(key);
        }
        let key_columns = self.schema.key_columns();
        self.tuples
            .iter()
            .position(|t| CompositeKey::from_tuple(t, key_columns) == *key)
    }

    pub fn contains_key(&self, key: &CompositeKey) -> bool {
        self.find_key(key).is_some()
    }

    // ════════════════════════════════════════════
    // Insert
    // ════════════════════════════════════════════

    /// Insert a tuple.
    ///
    /// Rejected, leaving the table unchanged, when the tuple has the wrong
    /// width ([`RelError::ArityMismatch`]), a value of the wrong kind
    /// ([`RelError::TypeMismatch`]) or a primary key already present
    /// ([`RelError::DuplicateKey`]).
    ///
    /// With [`IndexKind::None`] the duplicate-key check scans every stored
    /// row, so loading `n` rows costs O(n²). Bulk loads of large tables
    /// should use [`IndexKind::Hash`] or [`IndexKind::Ordered`].
    pub fn insert(&mut self, tuple: Tuple) -> RelResult<()> {
        debug!(
            target: "relalg::dml",
            "DML> insert into {} values {}",
            self.name,
            format_tuple(&tuple)
        );

        self.schema.type_check(&tuple).map_err(|err| match err {
            RelError::ArityMismatch {
                expected, actual, ..
            } => RelError::ArityMismatch {
                context: format!("insert into {}", self.name),
                expected,
                actual,
            },
            other => other,
        })?;

        let key = self.key_of(&tuple);
        if self.contains_key(&key) {
            return Err(RelError::DuplicateKey {
                table: self.name.clone(),
                key: key.to_string(),
            });
        }

        let row = self.tuples.len();
        self.tuples.push(tuple);
        if self.index.is_enabled() {
            self.index.put(key, row);
        }
        Ok(())
    }

    /// Insert a [`Row`] value.
    pub fn insert_row<R: Row>(&mut self, row: R) -> RelResult<()> {
        self.insert(row.into_tuple())
    }
}

//! Unary and set operators: project, select, union, minus.
//!
//! Operators never touch their operands; each result is a new table named
//! after the receiver plus a sequence number.

use super::{Table, temp_name};
use crate::error::{RelError, RelResult};
use crate::schema::{Schema, split_names};
use crate::types::{CompositeKey, Tuple};
use ahash::AHashSet;
use tracing::{debug, warn};

impl Table {
    /// Project the tuples onto the given attributes, in the given order.
    ///
    /// Rows and duplicates are kept. The original key survives when every
    /// key attribute is projected; otherwise the projected list becomes the
    /// key. Unknown names are logged and skipped; a request in which no
    /// name resolves fails with [`RelError::AttributeNotFound`].
    ///
    /// ```rust
    /// # use relalg_core::{Table, tuple};
    /// # fn main() -> relalg_core::RelResult<()> {
    /// # let mut movie = Table::new("movie", "title year studioNo", "String Integer Integer", "title year")?;
    /// # movie.insert(tuple!["Star_Wars", 1977, 1])?;
    /// let titles = movie.project("title year")?;
    /// assert_eq!(titles.attributes(), ["title", "year"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn project(&self, attributes: &str) -> RelResult<Table> {
        debug!(target: "relalg::ra", "RA> {}.project ({})", self.name, attributes);

        let columns = self.schema.resolve_columns(&split_names(attributes));
        if columns.is_empty() {
            return Err(RelError::AttributeNotFound(attributes.trim().to_string()));
        }

        let names: Vec<String> = columns
            .iter()
            .map(|&c| self.schema.attributes()[c].clone())
            .collect();
        let key = if self.schema.key().iter().all(|k| names.contains(k)) {
            self.schema.key().to_vec()
        } else {
            names.clone()
        };
        let domains = self.schema.extract_domains(&columns);
        let schema = Schema::new(names, domains, key)?;

        let rows: Vec<Tuple> = self
            .tuples
            .iter()
            .map(|t| columns.iter().map(|&c| t[c].clone()).collect::<Tuple>())
            .collect();

        Ok(Table::derived(
            temp_name(&self.name),
            schema,
            self.index_kind(),
            rows,
        ))
    }

    /// Keep the tuples satisfying `predicate`, in their original order.
    ///
    /// ```rust
    /// # use relalg_core::{Table, Value, tuple};
    /// # fn main() -> relalg_core::RelResult<()> {
    /// # let mut movie = Table::new("movie", "title year", "String Integer", "title")?;
    /// # movie.insert(tuple!["Star_Wars", 1977])?;
    /// # movie.insert(tuple!["Rocky", 1985])?;
    /// let year = movie.col("year").unwrap();
    /// let seventies = movie.select(|t| t[year] < Value::Integer(1980));
    /// assert_eq!(seventies.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn select<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Tuple) -> bool,
    {
        debug!(target: "relalg::ra", "RA> {}.select (<predicate>)", self.name);

        let rows: Vec<Tuple> = self.tuples.iter().filter(|t| predicate(t)).cloned().collect();
        Table::derived(
            temp_name(&self.name),
            self.schema.clone(),
            self.index_kind(),
            rows,
        )
    }

    /// Select the tuple whose primary key equals `key` (zero or one row).
    ///
    /// Probes the index when one is configured and scans otherwise.
    pub fn select_key(&self, key: &CompositeKey) -> RelResult<Table> {
        debug!(target: "relalg::ra", "RA> {}.select ({})", self.name, key);

        let width = self.schema.key_columns().len();
        if key.len() != width {
            return Err(RelError::ArityMismatch {
                context: format!("key select on {}", self.name),
                expected: width,
                actual: key.len(),
            });
        }

        let rows: Vec<Tuple> = self
            .find_key(key)
            .map(|row| vec![self.tuples[row].clone()])
            .unwrap_or_default();

        Ok(Table::derived(
            temp_name(&self.name),
            self.schema.clone(),
            self.index_kind(),
            rows,
        ))
    }

    /// Set union: this table's distinct tuples, then `other`'s new ones.
    ///
    /// Fails with [`RelError::SchemaMismatch`] unless the schemas are
    /// compatible.
    pub fn union(&self, other: &Table) -> RelResult<Table> {
        debug!(target: "relalg::ra", "RA> {}.union ({})", self.name, other.name);
        self.check_compatible(other)?;

        let mut seen: AHashSet<&Tuple> = AHashSet::with_capacity(self.len() + other.len());
        let rows: Vec<Tuple> = self
            .tuples
            .iter()
            .chain(other.tuples.iter())
            .filter(|t| seen.insert(*t))
            .cloned()
            .collect();

        Ok(Table::derived(
            temp_name(&self.name),
            self.schema.clone(),
            self.index_kind(),
            rows,
        ))
    }

    /// Difference: this table's tuples minus every tuple equal to one of
    /// `other`'s. Fails with [`RelError::SchemaMismatch`] unless the schemas
    /// are compatible.
    pub fn minus(&self, other: &Table) -> RelResult<Table> {
        debug!(target: "relalg::ra", "RA> {}.minus ({})", self.name, other.name);
        self.check_compatible(other)?;

        let exclude: AHashSet<&Tuple> = other.tuples.iter().collect();
        let rows: Vec<Tuple> = self
            .tuples
            .iter()
            .filter(|t| !exclude.contains(t))
            .cloned()
            .collect();

        Ok(Table::derived(
            temp_name(&self.name),
            self.schema.clone(),
            self.index_kind(),
            rows,
        ))
    }

    fn check_compatible(&self, other: &Table) -> RelResult<()> {
        self.schema.check_compatible(&other.schema).inspect_err(|err| {
            warn!(left = %self.name, right = %other.name, "compatible: {err}");
        })
    }
}

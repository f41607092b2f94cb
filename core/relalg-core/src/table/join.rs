//! Join operators: equi-join and natural join.
//!
//! Every strategy first computes the matching `(left_row, right_row)` pairs,
//! sorted in nested-loop order, then materializes `left ++ right` tuples.
//! The strategies therefore produce identical tables and differ only in cost:
//!
//! | strategy     | cost                        | requirement                    |
//! |--------------|-----------------------------|--------------------------------|
//! | `NestedLoop` | O(\|L\| · \|R\|)            | none                           |
//! | `Index`      | O(\|L\| · lookup)           | right side indexed on its key  |
//! | `Hash`       | O(\|L\| + \|R\| + out·log)  | none                           |

use super::{Table, temp_name};
use crate::error::{RelError, RelResult};
use crate::schema::{Schema, split_names};
use crate::types::{CompositeKey, Tuple};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Suffix appended to a right-side attribute whose name is already taken
const DISAMBIGUATION_SUFFIX: char = '2';

/// Join algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStrategy {
    /// Compare every pair of tuples
    #[default]
    NestedLoop,
    /// Probe the right table's primary-key index; falls back to the nested
    /// loop when the join attributes are not exactly that key
    Index,
    /// Build a hash table over the smaller side, probe with the other
    Hash,
}

impl Table {
    /// Equi-join using a nested loop.
    ///
    /// Tuples match when `attributes1` of this table equal `attributes2` of
    /// `other`, position by position. Right-side names that collide with a
    /// left-side name get a `2` appended.
    ///
    /// ```rust
    /// # use relalg_core::{Table, tuple};
    /// # fn main() -> relalg_core::RelResult<()> {
    /// let mut movie = Table::new("movie", "title studioName", "String String", "title")?;
    /// movie.insert(tuple!["Star_Wars", "Fox"])?;
    /// let mut studio = Table::new("studio", "name address", "String String", "name")?;
    /// studio.insert(tuple!["Fox", "Los Angeles"])?;
    ///
    /// let joined = movie.join("studioName", "name", &studio)?;
    /// assert_eq!(joined.attributes(), ["title", "studioName", "name", "address"]);
    /// assert_eq!(joined.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn join(&self, attributes1: &str, attributes2: &str, other: &Table) -> RelResult<Table> {
        self.join_with(JoinStrategy::NestedLoop, attributes1, attributes2, other)
    }

    /// Equi-join probing `other`'s primary-key index.
    pub fn index_join(&self, attributes1: &str, attributes2: &str, other: &Table) -> RelResult<Table> {
        self.join_with(JoinStrategy::Index, attributes1, attributes2, other)
    }

    /// Equi-join through a temporary hash table.
    pub fn hash_join(&self, attributes1: &str, attributes2: &str, other: &Table) -> RelResult<Table> {
        self.join_with(JoinStrategy::Hash, attributes1, attributes2, other)
    }

    /// Equi-join with an explicit strategy.
    ///
    /// Fails with [`RelError::ArityMismatch`] when the attribute lists differ
    /// in length and with [`RelError::AttributeNotFound`] when a name is
    /// missing from its table.
    pub fn join_with(
        &self,
        strategy: JoinStrategy,
        attributes1: &str,
        attributes2: &str,
        other: &Table,
    ) -> RelResult<Table> {
        debug!(
            target: "relalg::ra",
            "RA> {}.join ({}, {}, {}) [{:?}]",
            self.name, attributes1, attributes2, other.name, strategy
        );

        let left_names = split_names(attributes1);
        let right_names = split_names(attributes2);
        if left_names.len() != right_names.len() {
            return Err(RelError::ArityMismatch {
                context: "join attribute lists".to_string(),
                expected: left_names.len(),
                actual: right_names.len(),
            });
        }
        let left_cols = self.schema.resolve_columns_strict(&left_names)?;
        let right_cols = other.schema.resolve_columns_strict(&right_names)?;

        let pairs = match_rows(strategy, self, &left_cols, other, &right_cols);
        let kept: Vec<usize> = (0..other.schema.arity()).collect();
        self.materialize(other, &pairs, &kept)
    }

    /// Natural join on the attributes both tables share with equal domains.
    ///
    /// Common attributes are matched by name, and the right-side copies are
    /// dropped from the output. With nothing in common the result is the
    /// Cartesian product.
    pub fn natural_join(&self, other: &Table) -> RelResult<Table> {
        self.natural_join_with(JoinStrategy::NestedLoop, other)
    }

    /// Natural join with an explicit strategy.
    pub fn natural_join_with(&self, strategy: JoinStrategy, other: &Table) -> RelResult<Table> {
        debug!(target: "relalg::ra", "RA> {}.join ({}) [{:?}]", self.name, other.name, strategy);

        let common: Vec<&str> = self
            .schema
            .attributes()
            .iter()
            .map(String::as_str)
            .filter(|name| {
                let mine = self.schema.domain_of(name);
                mine.is_some() && mine == other.schema.domain_of(name)
            })
            .collect();
        debug!(target: "relalg::ra", common = ?common, "natural join attributes");

        let left_cols = self.schema.resolve_columns_strict(&common)?;
        let right_cols = other.schema.resolve_columns_strict(&common)?;

        let pairs = match_rows(strategy, self, &left_cols, other, &right_cols);
        let kept: Vec<usize> = (0..other.schema.arity())
            .filter(|c| !right_cols.contains(c))
            .collect();
        self.materialize(other, &pairs, &kept)
    }

    /// Build the joined table: every column of `self`, then the `kept`
    /// columns of `other` (renamed where they collide).
    fn materialize(&self, other: &Table, pairs: &[(usize, usize)], kept: &[usize]) -> RelResult<Table> {
        let right_names: Vec<String> = kept
            .iter()
            .map(|&c| other.schema.attributes()[c].clone())
            .collect();

        let mut attributes = self.schema.attributes().to_vec();
        attributes.extend(disambiguate(self.schema.attributes(), &right_names));
        let mut domains = self.schema.domains().to_vec();
        domains.extend(other.schema.extract_domains(kept));
        let schema = Schema::new(attributes, domains, self.schema.key().to_vec())?;

        let rows: Vec<Tuple> = pairs
            .iter()
            .map(|&(i, j)| {
                let (left, right) = (&self.tuples[i], &other.tuples[j]);
                let mut row = Vec::with_capacity(left.len() + kept.len());
                row.extend(left.iter().cloned());
                row.extend(kept.iter().map(|&c| right[c].clone()));
                row
            })
            .collect();

        Ok(Table::derived(
            temp_name(&self.name),
            schema,
            self.index_kind(),
            rows,
        ))
    }
}

/// Rename each incoming name until it no longer collides.
fn disambiguate(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut taken: AHashSet<String> = existing.iter().cloned().collect();
    incoming
        .iter()
        .map(|name| {
            let mut candidate = name.clone();
            while taken.contains(&candidate) {
                candidate.push(DISAMBIGUATION_SUFFIX);
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn match_rows(
    strategy: JoinStrategy,
    left: &Table,
    left_cols: &[usize],
    right: &Table,
    right_cols: &[usize],
) -> Vec<(usize, usize)> {
    match strategy {
        JoinStrategy::NestedLoop => nested_loop_pairs(left, left_cols, right, right_cols),
        JoinStrategy::Hash => hash_pairs(left, left_cols, right, right_cols),
        JoinStrategy::Index => index_pairs(left, left_cols, right, right_cols).unwrap_or_else(|| {
            debug!(target: "relalg::ra", right = %right.name, "index join not applicable, using nested loop");
            nested_loop_pairs(left, left_cols, right, right_cols)
        }),
    }
}

fn nested_loop_pairs(left: &Table, left_cols: &[usize], right: &Table, right_cols: &[usize]) -> Vec<(usize, usize)> {
    let right_keys: Vec<CompositeKey> = right
        .tuples
        .iter()
        .map(|t| CompositeKey::from_tuple(t, right_cols))
        .collect();

    let mut pairs = Vec::new();
    for (i, t1) in left.tuples.iter().enumerate() {
        let k1 = CompositeKey::from_tuple(t1, left_cols);
        for (j, k2) in right_keys.iter().enumerate() {
            if k1 == *k2 {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn hash_pairs(left: &Table, left_cols: &[usize], right: &Table, right_cols: &[usize]) -> Vec<(usize, usize)> {
    // Build over the smaller side.
    let build_is_left = left.len() <= right.len();
    let (build, build_cols, probe, probe_cols) = if build_is_left {
        (left, left_cols, right, right_cols)
    } else {
        (right, right_cols, left, left_cols)
    };

    let mut buckets: AHashMap<CompositeKey, Vec<usize>> = AHashMap::with_capacity(build.len());
    for (row, tuple) in build.tuples.iter().enumerate() {
        buckets
            .entry(CompositeKey::from_tuple(tuple, build_cols))
            .or_default()
            .push(row);
    }

    let mut pairs = Vec::new();
    for (row, tuple) in probe.tuples.iter().enumerate() {
        if let Some(matches) = buckets.get(&CompositeKey::from_tuple(tuple, probe_cols)) {
            for &other in matches {
                pairs.push(if build_is_left { (other, row) } else { (row, other) });
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// `None` when `right` has no usable index or the join columns are not
/// exactly its primary key.
fn index_pairs(left: &Table, left_cols: &[usize], right: &Table, right_cols: &[usize]) -> Option<Vec<(usize, usize)>> {
    let key_cols = right.schema.key_columns();
    if !right.index().is_enabled() || !right.key_unique() || key_cols.len() != right_cols.len() {
        return None;
    }

    // Left columns rearranged into the right key's column order.
    let probe_cols = key_cols
        .iter()
        .map(|kc| right_cols.iter().position(|rc| rc == kc).map(|p| left_cols[p]))
        .collect::<Option<Vec<usize>>>()?;

    let index = right.index();
    Some(
        left.tuples
            .iter()
            .enumerate()
            .filter_map(|(i, t)| index.get(&CompositeKey::from_tuple(t, &probe_cols)).map(|j| (i, j)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexKind;
    use crate::tuple;
    use crate::types::Value;

    fn star(index: IndexKind) -> Table {
        let mut t = Table::with_index("movieStar", "name address gender", "String String Character", "name", index).unwrap();
        t.insert(tuple!["Carrie_Fisher", "Hollywood", 'F']).unwrap();
        t.insert(tuple!["Mark_Hamill", "Brentwood", 'M']).unwrap();
        t.insert(tuple!["Harrison_Ford", "Beverly_Hills", 'M']).unwrap();
        t
    }

    fn starred_in(index: IndexKind) -> Table {
        let mut t = Table::with_index("starsIn", "movieTitle movieYear starName", "String Integer String", "movieTitle movieYear starName", index).unwrap();
        t.insert(tuple!["Star_Wars", 1977, "Carrie_Fisher"]).unwrap();
        t.insert(tuple!["Star_Wars", 1977, "Mark_Hamill"]).unwrap();
        t.insert(tuple!["Rocky", 1985, "Sylvester_Stallone"]).unwrap();
        t.insert(tuple!["Star_Wars_2", 1980, "Carrie_Fisher"]).unwrap();
        t
    }

    #[test]
    fn test_equi_join_nested_loop() {
        let s = starred_in(IndexKind::None);
        let m = star(IndexKind::None);
        let j = s.join("starName", "name", &m).unwrap();

        assert_eq!(j.len(), 3);
        assert_eq!(j.schema().arity(), 6);
        assert_eq!(j.schema().key(), s.schema().key());
        assert_eq!(
            j.tuples()[0],
            tuple!["Star_Wars", 1977, "Carrie_Fisher", "Carrie_Fisher", "Hollywood", 'F']
        );
        let star_name = j.col("starName").unwrap();
        let name = j.col("name").unwrap();
        assert!(j.tuples().iter().all(|t| t[star_name] == t[name]));
    }

    #[test]
    fn test_equi_join_arity_mismatch() {
        let s = starred_in(IndexKind::None);
        let m = star(IndexKind::None);
        let err = s.join("starName movieYear", "name", &m).unwrap_err();
        assert!(matches!(err, RelError::ArityMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_equi_join_unknown_attribute() {
        let s = starred_in(IndexKind::None);
        let m = star(IndexKind::None);
        let err = s.join("starName", "fullName", &m).unwrap_err();
        assert!(matches!(err, RelError::AttributeNotFound(name) if name == "fullName"));
    }

    #[test]
    fn test_self_join_disambiguates() {
        let m = star(IndexKind::None);
        let j = m.join("gender", "gender", &m).unwrap();
        assert_eq!(
            j.attributes(),
            ["name", "address", "gender", "name2", "address2", "gender2"]
        );
        // F×F + M×M (2×2)
        assert_eq!(j.len(), 5);
    }

    #[test]
    fn test_disambiguate_repeats_suffix() {
        let existing = vec!["a".to_string(), "a2".to_string()];
        let incoming = vec!["a".to_string(), "b".to_string()];
        assert_eq!(disambiguate(&existing, &incoming), ["a22", "b"]);
    }

    #[test]
    fn test_strategies_agree() {
        crate::logging::init_test();
        for kind in [IndexKind::None, IndexKind::Ordered, IndexKind::Hash] {
            let s = starred_in(kind);
            let m = star(kind);
            let nested = s.join("starName", "name", &m).unwrap();
            let hashed = s.hash_join("starName", "name", &m).unwrap();
            let indexed = s.index_join("starName", "name", &m).unwrap();
            assert_eq!(nested.tuples(), hashed.tuples());
            assert_eq!(nested.tuples(), indexed.tuples());

            // Hash build side flips when the left input is larger.
            let flipped = m.hash_join("name", "starName", &s).unwrap();
            assert_eq!(flipped.tuples(), m.join("name", "starName", &s).unwrap().tuples());
        }
    }

    #[test]
    fn test_index_pairs_requires_key_columns() {
        let s = starred_in(IndexKind::None);
        let m = star(IndexKind::Hash);
        let left_cols = s.schema().resolve_columns_strict(&["starName"]).unwrap();
        let key_cols = m.schema().resolve_columns_strict(&["name"]).unwrap();
        let addr_cols = m.schema().resolve_columns_strict(&["address"]).unwrap();
        assert!(index_pairs(&s, &left_cols, &m, &key_cols).is_some());
        assert!(index_pairs(&s, &left_cols, &m, &addr_cols).is_none());
        assert!(index_pairs(&m, &key_cols, &s, &left_cols).is_none());
    }

    #[test]
    fn test_index_join_reorders_composite_key() {
        let mut m = Table::with_index("m", "year title len", "Integer String Integer", "title year", IndexKind::Ordered).unwrap();
        m.insert(tuple![1977, "Star_Wars", 124]).unwrap();
        m.insert(tuple![1985, "Rocky", 200]).unwrap();
        let s = starred_in(IndexKind::None);

        let via_index = s.index_join("movieYear movieTitle", "year title", &m).unwrap();
        let nested = s.join("movieYear movieTitle", "year title", &m).unwrap();
        assert_eq!(via_index.tuples(), nested.tuples());
        assert_eq!(via_index.len(), 3);
    }

    #[test]
    fn test_natural_join_by_name() {
        // Common attribute `name` sits at different positions on each side.
        let mut owners = Table::new("owners", "pet name", "String String", "pet").unwrap();
        owners.insert(tuple!["rex", "ann"]).unwrap();
        owners.insert(tuple!["tom", "bob"]).unwrap();
        let mut people = Table::new("people", "name age", "String Integer", "name").unwrap();
        people.insert(tuple!["ann", 30]).unwrap();
        people.insert(tuple!["cat", 41]).unwrap();

        let j = owners.natural_join(&people).unwrap();
        assert_eq!(j.attributes(), ["pet", "name", "age"]);
        assert_eq!(j.tuples(), [tuple!["rex", "ann", 30]]);
    }

    #[test]
    fn test_natural_join_ignores_domain_disagreement() {
        let mut a = Table::new("a", "id code", "Integer String", "id").unwrap();
        a.insert(tuple![1, "x"]).unwrap();
        let mut b = Table::new("b", "code id", "Integer Integer", "id").unwrap();
        b.insert(tuple![7, 1]).unwrap();
        b.insert(tuple![8, 2]).unwrap();

        let j = a.natural_join(&b).unwrap();
        // Joined on `id` only; b.code survives under a new name.
        assert_eq!(j.attributes(), ["id", "code", "code2"]);
        assert_eq!(j.tuples(), [vec![Value::Integer(1), Value::from("x"), Value::Integer(7)]]);
    }

    #[test]
    fn test_natural_join_without_common_is_product() {
        let a = star(IndexKind::None);
        let mut b = Table::new("b", "n", "Integer", "n").unwrap();
        b.insert(tuple![1]).unwrap();
        b.insert(tuple![2]).unwrap();
        let j = a.natural_join(&b).unwrap();
        assert_eq!(j.len(), a.len() * b.len());
        assert_eq!(j.schema().arity(), 4);
    }
}

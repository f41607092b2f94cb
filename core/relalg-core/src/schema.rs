//! Schema: attribute names, their domains and the primary key.
//!
//! A schema is validated once at construction and immutable afterwards.

use crate::error::{RelError, RelResult};
use crate::types::{Domain, Value};
use std::collections::HashSet;
use tracing::warn;

/// Ordered attribute names, parallel domains and the primary-key subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<String>,
    domains: Vec<Domain>,
    key: Vec<String>,
    /// Positions of the key attributes, in key order
    key_columns: Vec<usize>,
}

impl Schema {
    /// Build a schema, checking its invariants.
    ///
    /// Fails with [`RelError::Schema`] when the attribute list is empty or
    /// repeats a name, when attributes and domains differ in length, or when
    /// the key is empty, repeats a name or names an unknown attribute.
    pub fn new(attributes: Vec<String>, domains: Vec<Domain>, key: Vec<String>) -> RelResult<Self> {
        if attributes.is_empty() {
            return Err(RelError::Schema("schema has no attributes".to_string()));
        }
        if attributes.len() != domains.len() {
            return Err(RelError::Schema(format!(
                "{} attributes but {} domains",
                attributes.len(),
                domains.len()
            )));
        }
        let mut seen = HashSet::with_capacity(attributes.len());
        for attr in &attributes {
            if !seen.insert(attr.as_str()) {
                return Err(RelError::Schema(format!("duplicate attribute '{attr}'")));
            }
        }
        if key.is_empty() {
            return Err(RelError::Schema("primary key is empty".to_string()));
        }
        let mut seen_key = HashSet::with_capacity(key.len());
        for k in &key {
            if !seen_key.insert(k.as_str()) {
                return Err(RelError::Schema(format!("duplicate key attribute '{k}'")));
            }
        }
        let key_columns = key
            .iter()
            .map(|k| {
                attributes.iter().position(|a| a == k).ok_or_else(|| {
                    RelError::Schema(format!("key attribute '{k}' is not in the schema"))
                })
            })
            .collect::<RelResult<Vec<_>>>()?;

        Ok(Self {
            attributes,
            domains,
            key,
            key_columns,
        })
    }

    /// Parse the whitespace-separated schema strings used by the
    /// construction surface, e.g. `("title year", "String Integer", "title")`.
    pub fn parse(attributes: &str, domains: &str, key: &str) -> RelResult<Self> {
        Self::new(
            split_names(attributes).into_iter().map(String::from).collect(),
            Domain::parse_list(domains)?,
            split_names(key).into_iter().map(String::from).collect(),
        )
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Column positions of the primary key
    pub fn key_columns(&self) -> &[usize] {
        &self.key_columns
    }

    /// Number of attributes
    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    /// Column position of `name`, or `None` when the schema lacks it.
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == name)
    }

    /// Domain of the attribute called `name`
    pub fn domain_of(&self, name: &str) -> Option<Domain> {
        self.column_of(name).map(|col| self.domains[col])
    }

    /// Resolve names to positions, skipping the ones that do not exist.
    ///
    /// Each unresolved name is logged; resolution continues with the rest.
    pub fn resolve_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<usize> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let col = self.column_of(name);
                if col.is_none() {
                    warn!(attribute = %name, "match: attribute not found in schema");
                }
                col
            })
            .collect()
    }

    /// Resolve names to positions, failing on the first unknown name.
    pub fn resolve_columns_strict<S: AsRef<str>>(&self, names: &[S]) -> RelResult<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column_of(name)
                    .ok_or_else(|| RelError::AttributeNotFound(name.to_string()))
            })
            .collect()
    }

    /// Domains at the given positions
    pub fn extract_domains(&self, columns: &[usize]) -> Vec<Domain> {
        columns.iter().map(|&c| self.domains[c]).collect()
    }

    /// Same arity and pairwise-equal domains.
    pub fn check_compatible(&self, other: &Schema) -> RelResult<()> {
        if self.domains.len() != other.domains.len() {
            return Err(RelError::SchemaMismatch(format!(
                "tables have different arity ({} vs {})",
                self.domains.len(),
                other.domains.len()
            )));
        }
        if let Some(col) = (0..self.domains.len()).find(|&j| self.domains[j] != other.domains[j]) {
            return Err(RelError::SchemaMismatch(format!(
                "tables disagree on domain {col} ({} vs {})",
                self.domains[col], other.domains[col]
            )));
        }
        Ok(())
    }

    /// Boolean form of [`Schema::check_compatible`]; logs the disagreement.
    pub fn compatible(&self, other: &Schema) -> bool {
        match self.check_compatible(other) {
            Ok(()) => true,
            Err(err) => {
                warn!("compatible: {err}");
                false
            }
        }
    }

    /// Check a tuple's width and each value's kind against this schema.
    pub fn type_check(&self, tuple: &[Value]) -> RelResult<()> {
        if tuple.len() != self.arity() {
            return Err(RelError::ArityMismatch {
                context: "tuple width".to_string(),
                expected: self.arity(),
                actual: tuple.len(),
            });
        }
        for ((value, domain), attr) in tuple.iter().zip(&self.domains).zip(&self.attributes) {
            if !domain.accepts(value) {
                return Err(RelError::TypeMismatch {
                    column: attr.clone(),
                    expected: domain.to_string(),
                    actual: value.domain().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Split a whitespace-separated attribute list.
pub fn split_names(names: &str) -> Vec<&str> {
    names.split_whitespace().collect()
}

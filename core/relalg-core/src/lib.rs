//! # relalg — In-Memory Relational Algebra Engine
//!
//! Typed tables of tuples with the classic relational operators. Every
//! operator reads its operands and returns a fresh table, so expressions
//! compose without side effects.
//!
//! ## Quick start
//!
//! ```rust
//! use relalg_core::{Table, tuple};
//!
//! # fn main() -> relalg_core::RelResult<()> {
//! let mut movie = Table::new(
//!     "movie",
//!     "title year length genre studioName producerNo",
//!     "String Integer Integer String String Integer",
//!     "title year",
//! )?;
//! movie.insert(tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345])?;
//! movie.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125])?;
//!
//! let mut studio = Table::new("studio", "name address presNo", "String String Integer", "name")?;
//! studio.insert(tuple!["Fox", "Los_Angeles", 7777])?;
//! studio.insert(tuple!["Universal", "Universal_City", 8888])?;
//!
//! let joined = movie.join("studioName", "name", &studio)?;
//! let answer = joined.project("title address")?;
//! assert_eq!(answer.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Operators
//!
//! | operator                  | result key            | failure                       |
//! |---------------------------|-----------------------|-------------------------------|
//! | `project(attrs)`          | kept key or `attrs`   | nothing resolves              |
//! | `select(pred)`            | unchanged             | never                         |
//! | `select_key(key)`         | unchanged             | wrong key width               |
//! | `union(other)`            | unchanged             | incompatible schemas          |
//! | `minus(other)`            | unchanged             | incompatible schemas          |
//! | `join(a1, a2, other)`     | left key              | list lengths, unknown names   |
//! | `natural_join(other)`     | left key              | never                         |
//!
//! ## Modules
//!
//! - [`table`] — [`Table`] and its operators
//! - [`schema`] — attribute names, domains and key
//! - [`types`] — [`Value`], [`Domain`], [`CompositeKey`], [`Row`]
//! - [`index`] — pluggable primary-key index ([`IndexKind`])
//! - [`persist`] — [`TableStore`] save/load
//! - [`config`] — [`EngineConfig`] from defaults, JSON and environment
//! - [`error`] — [`RelError`] / [`RelResult`]
//! - [`logging`] — `tracing` subscriber setup

// Lets `#[derive(Row)]` output (`::relalg_core::…`) resolve inside this crate.
extern crate self as relalg_core;

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod persist;
pub mod schema;
pub mod table;
pub mod types;

pub use config::{EngineConfig, StoreConfig, StoreFormat};
pub use error::{RelError, RelResult};
pub use index::{IndexKind, KeyIndex};
pub use persist::TableStore;
pub use schema::Schema;
pub use table::{JoinStrategy, Table};
pub use types::{CompositeKey, Domain, IntoDomain, Row, Tuple, Value, format_tuple};

/// `#[derive(Row)]` — see [`Row`].
pub use relalg_derive::Row;

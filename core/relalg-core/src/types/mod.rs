//! Value model: domains, scalar values, tuples and composite keys.

mod domain;
mod key;
mod row;
mod value;

pub use domain::Domain;
pub use key::CompositeKey;
pub use row::{IntoDomain, Row};
pub use value::{Tuple, Value, format_tuple};

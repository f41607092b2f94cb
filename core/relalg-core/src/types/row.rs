//! Row traits backing `#[derive(Row)]`

use crate::error::RelResult;
use crate::schema::Schema;
use crate::types::{Domain, Tuple, Value};

/// A Rust struct that maps onto one table row.
///
/// Usually implemented through `#[derive(Row)]`.
pub trait Row {
    /// Default relation name for tables of this row type
    const RELATION: &'static str;

    /// Attribute names, domains and key derived from the struct fields
    fn schema() -> RelResult<Schema>;

    /// Field values in schema order
    fn into_tuple(self) -> Tuple;
}

/// Rust scalar type with a fixed column domain.
pub trait IntoDomain: Into<Value> {
    fn domain() -> Domain;
}

macro_rules! impl_into_domain {
    ($($ty:ty => $domain:ident),* $(,)?) => {
        $(
            impl IntoDomain for $ty {
                fn domain() -> Domain {
                    Domain::$domain
                }
            }
        )*
    };
}

impl_into_domain! {
    i32 => Integer,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
    f64 => Double,
    f32 => Float,
    char => Character,
    String => Text,
}

//! Scalar values and tuples

use crate::types::Domain;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One row's values in schema order.
pub type Tuple = Vec<Value>;

/// A scalar value tagged with its kind.
///
/// Equality is structural per kind: values of different kinds are never equal
/// (`Integer(1) != Long(1)`). Floats compare by bit pattern for equality and
/// hashing and by IEEE total order for ordering, so every value can serve as
/// a map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Integer(i32),
    Long(i64),
    Short(i16),
    Byte(i8),
    Double(f64),
    Float(f32),
    Character(char),
    Text(String),
}

impl Value {
    /// Runtime kind of this value
    pub fn domain(&self) -> Domain {
        match self {
            Value::Integer(_) => Domain::Integer,
            Value::Long(_) => Domain::Long,
            Value::Short(_) => Domain::Short,
            Value::Byte(_) => Domain::Byte,
            Value::Double(_) => Domain::Double,
            Value::Float(_) => Domain::Float,
            Value::Character(_) => Domain::Character,
            Value::Text(_) => Domain::Text,
        }
    }

    /// Widen any integer kind to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Byte(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Widen any numeric kind to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Float(v) => Some(f64::from(*v)),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    // Position of the kind in the cross-kind ordering.
    fn rank(&self) -> u8 {
        match self {
            Value::Integer(_) => 0,
            Value::Long(_) => 1,
            Value::Short(_) => 2,
            Value::Byte(_) => 3,
            Value::Double(_) => 4,
            Value::Float(_) => 5,
            Value::Character(_) => 6,
            Value::Text(_) => 7,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Integer(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Character(v) => v.hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Short(a), Value::Short(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Character(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    i32 => Integer,
    i64 => Long,
    i16 => Short,
    i8 => Byte,
    f64 => Double,
    f32 => Float,
    char => Character,
    String => Text,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Build a [`Tuple`] from heterogeneous literals.
///
/// ```rust
/// use relalg_core::{tuple, Value};
///
/// let t = tuple!["Star_Wars", 1977, 124];
/// assert_eq!(t[1], Value::Integer(1977));
/// ```
#[macro_export]
macro_rules! tuple {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::Value::from($v)),*]
    };
}

/// Render a tuple as `(a, b, c)`.
pub fn format_tuple(tuple: &[Value]) -> String {
    let parts: Vec<String> = tuple.iter().map(|v| v.to_string()).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_kinds_never_equal_across_domains() {
        assert_ne!(Value::Integer(1), Value::Long(1));
        assert_ne!(Value::Short(7), Value::Byte(7));
        assert_eq!(Value::Integer(1), Value::Integer(1));
    }

    #[test]
    fn test_float_values_hash_consistently() {
        let mut set = HashSet::new();
        set.insert(Value::Double(1.5));
        set.insert(Value::Double(1.5));
        set.insert(Value::Double(f64::NAN));
        set.insert(Value::Double(f64::NAN));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ordering_within_kind() {
        assert!(Value::from("Rambo") < Value::from("Rocky"));
        assert!(Value::Double(-1.0) < Value::Double(2.0));
        assert!(Value::Integer(1977) < Value::Integer(1980));
    }

    #[test]
    fn test_ordering_across_kinds_is_total() {
        let mut values = vec![Value::from("a"), Value::Integer(3), Value::Character('x')];
        values.sort();
        assert_eq!(values[0], Value::Integer(3));
        assert_eq!(values[2], Value::from("a"));
    }

    #[test]
    fn test_tuple_macro() {
        let t = tuple!["Fox", 12345, 'c', 2.5];
        assert_eq!(
            t,
            vec![
                Value::Text("Fox".into()),
                Value::Integer(12345),
                Value::Character('c'),
                Value::Double(2.5),
            ]
        );
        assert_eq!(format_tuple(&t), "(Fox, 12345, c, 2.5)");
    }

    #[test]
    fn test_numeric_widening_accessors() {
        assert_eq!(Value::Short(12).as_i64(), Some(12));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::from("x").as_i64(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
    }
}

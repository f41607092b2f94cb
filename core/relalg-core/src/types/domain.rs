//! Column domains: the scalar kinds a column may hold.

use crate::error::{RelError, RelResult};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar type of a column.
///
/// Schema strings name domains by the tokens returned from [`Domain::as_str`];
/// `Text` is accepted as an alias of `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 16-bit signed integer
    Short,
    /// 8-bit signed integer
    Byte,
    /// 64-bit float
    Double,
    /// 32-bit float
    Float,
    /// Single Unicode scalar
    Character,
    /// UTF-8 string
    Text,
}

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::Integer,
        Domain::Long,
        Domain::Short,
        Domain::Byte,
        Domain::Double,
        Domain::Float,
        Domain::Character,
        Domain::Text,
    ];

    /// Schema-string token for this domain
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Integer => "Integer",
            Domain::Long => "Long",
            Domain::Short => "Short",
            Domain::Byte => "Byte",
            Domain::Double => "Double",
            Domain::Float => "Float",
            Domain::Character => "Character",
            Domain::Text => "String",
        }
    }

    /// Parse a single schema-string token
    pub fn parse_domain(token: &str) -> Option<Self> {
        match token {
            "Integer" => Some(Domain::Integer),
            "Long" => Some(Domain::Long),
            "Short" => Some(Domain::Short),
            "Byte" => Some(Domain::Byte),
            "Double" => Some(Domain::Double),
            "Float" => Some(Domain::Float),
            "Character" => Some(Domain::Character),
            "String" | "Text" => Some(Domain::Text),
            _ => None,
        }
    }

    /// Parse a whitespace-separated list such as `"String Integer Integer"`.
    ///
    /// Every unrecognized token is reported in the error.
    pub fn parse_list(domains: &str) -> RelResult<Vec<Domain>> {
        let mut parsed = Vec::new();
        let mut unknown = Vec::new();
        for token in domains.split_whitespace() {
            match Domain::parse_domain(token) {
                Some(domain) => parsed.push(domain),
                None => unknown.push(token),
            }
        }
        if !unknown.is_empty() {
            return Err(RelError::Schema(format!(
                "unknown domain(s): {}",
                unknown.join(", ")
            )));
        }
        Ok(parsed)
    }

    /// Integer and real domains
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Domain::Character | Domain::Text)
    }

    /// Whether `value` is well-typed for a column of this domain.
    ///
    /// Kinds must match exactly; there is no implicit widening.
    pub fn accepts(&self, value: &Value) -> bool {
        value.domain() == *self
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = RelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::parse_domain(s).ok_or_else(|| RelError::Schema(format!("unknown domain: {s}")))
    }
}

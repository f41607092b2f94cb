//! Error types for the relalg engine.
//!
//! All public APIs return `RelResult<T>`: no panics in library code.

use thiserror::Error;

/// Unified error type for all relalg operations.
#[derive(Debug, Error)]
pub enum RelError {
    /// Invalid schema definition (unknown domain token, missing key column, ...)
    #[error("schema error: {0}")]
    Schema(String),

    /// Two tables disagree on arity or domains (union, minus)
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Value count or attribute list length does not match
    #[error("arity mismatch in {context}: expected {expected}, got {actual}")]
    ArityMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Inserted value does not conform to its column's domain
    #[error("type mismatch on column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Referenced attribute does not exist in the schema
    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),

    /// Primary-key value already present in the table
    #[error("duplicate key {key} in table '{table}'")]
    DuplicateKey { table: String, key: String },

    /// Save/load failure (missing file, corrupt content, ...)
    #[error("persistence error at {path}: {message}")]
    Persistence { path: String, message: String },

    /// Invalid engine configuration
    #[error("config error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Apache Arrow error (RecordBatch export)
    #[error("arrow error: {source}")]
    Arrow {
        #[from]
        source: arrow::error::ArrowError,
    },
}

/// Result type alias for all relalg operations.
pub type RelResult<T> = Result<T, RelError>;

impl From<serde_json::Error> for RelError {
    fn from(err: serde_json::Error) -> Self {
        RelError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for RelError {
    fn from(err: bincode::Error) -> Self {
        RelError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_schema_mismatch() {
        let err = RelError::SchemaMismatch("tables disagree on domain 2".to_string());
        assert_eq!(err.to_string(), "schema mismatch: tables disagree on domain 2");
    }

    #[test]
    fn error_display_attribute_not_found() {
        let err = RelError::AttributeNotFound("studioNo".to_string());
        assert_eq!(err.to_string(), "attribute 'studioNo' not found");
    }

    #[test]
    fn error_display_type_mismatch() {
        let err = RelError::TypeMismatch {
            column: "year".to_string(),
            expected: "Integer".to_string(),
            actual: "String".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch on column 'year': expected Integer, got String"
        );
    }

    #[test]
    fn error_display_arity_mismatch() {
        let err = RelError::ArityMismatch {
            context: "insert into movie".to_string(),
            expected: 6,
            actual: 5,
        };
        assert!(err.to_string().contains("insert into movie"));
        assert!(err.to_string().contains("expected 6, got 5"));
    }

    #[test]
    fn error_display_duplicate_key() {
        let err = RelError::DuplicateKey {
            table: "movie".to_string(),
            key: "(Star_Wars, 1977)".to_string(),
        };
        assert!(err.to_string().contains("duplicate key (Star_Wars, 1977)"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RelError = io.into();
        assert!(matches!(err, RelError::Io { .. }));
    }

    #[test]
    fn rel_result_err() {
        let result: RelResult<i32> = Err(RelError::Config("bad index".to_string()));
        assert!(result.is_err());
    }
}

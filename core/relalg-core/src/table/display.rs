//! Arrow export and tabular rendering.

use super::Table;
use crate::error::RelResult;
use crate::types::{Domain, Value, format_tuple};
use arrow::array::{
    ArrayRef, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use std::fmt::Write as _;
use std::sync::Arc;

/// Arrow type used for a column domain
pub(crate) fn arrow_type(domain: Domain) -> DataType {
    match domain {
        Domain::Integer => DataType::Int32,
        Domain::Long => DataType::Int64,
        Domain::Short => DataType::Int16,
        Domain::Byte => DataType::Int8,
        Domain::Double => DataType::Float64,
        Domain::Float => DataType::Float32,
        Domain::Character | Domain::Text => DataType::Utf8,
    }
}

macro_rules! primitive_column {
    ($tuples:expr, $col:expr, $variant:ident, $array:ty) => {
        Arc::new(
            $tuples
                .iter()
                .map(|t| match &t[$col] {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                })
                .collect::<$array>(),
        ) as ArrayRef
    };
}

impl Table {
    /// Copy the tuples into a single Arrow [`RecordBatch`].
    pub fn to_record_batch(&self) -> RelResult<RecordBatch> {
        let fields: Vec<Field> = self
            .schema
            .attributes()
            .iter()
            .zip(self.schema.domains())
            .map(|(name, &domain)| Field::new(name, arrow_type(domain), true))
            .collect();

        let columns: Vec<ArrayRef> = self
            .schema
            .domains()
            .iter()
            .enumerate()
            .map(|(col, &domain)| self.arrow_column(col, domain))
            .collect();

        Ok(RecordBatch::try_new(
            Arc::new(ArrowSchema::new(fields)),
            columns,
        )?)
    }

    fn arrow_column(&self, col: usize, domain: Domain) -> ArrayRef {
        let tuples = &self.tuples;
        match domain {
            Domain::Integer => primitive_column!(tuples, col, Integer, Int32Array),
            Domain::Long => primitive_column!(tuples, col, Long, Int64Array),
            Domain::Short => primitive_column!(tuples, col, Short, Int16Array),
            Domain::Byte => primitive_column!(tuples, col, Byte, Int8Array),
            Domain::Double => primitive_column!(tuples, col, Double, Float64Array),
            Domain::Float => primitive_column!(tuples, col, Float, Float32Array),
            Domain::Character | Domain::Text => Arc::new(
                tuples
                    .iter()
                    .map(|t| match &t[col] {
                        Value::Character(c) => Some(c.to_string()),
                        Value::Text(s) => Some(s.clone()),
                        _ => None,
                    })
                    .collect::<StringArray>(),
            ),
        }
    }

    /// Boxed text table: the name, then a header row and one line per tuple.
    pub fn render(&self) -> RelResult<String> {
        let batch = self.to_record_batch()?;
        let body = pretty_format_batches(&[batch])?;
        Ok(format!("Table {}\n{}", self.name, body))
    }

    pub fn print(&self) -> RelResult<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// One `key -> tuple` line per index entry, in the index's natural order.
    ///
    /// Empty when no index is configured.
    pub fn render_index(&self) -> String {
        let mut out = String::new();
        for (key, row) in self.index.entries() {
            let _ = writeln!(out, "{} -> {}", key, format_tuple(&self.tuples[row]));
        }
        out
    }

    pub fn print_index(&self) {
        println!("Index for {} ({})", self.name, self.index_kind());
        print!("{}", self.render_index());
    }
}

//! Results and rows.
//!
//! A [`QueryResult`] owns one page of raw cells plus the column specs and a
//! possible continuation token. Cells stay raw until asked for: decoding
//! happens when rows are materialized, against the column's CQL type and the
//! session's decode mode. Fetching the next page produces a new result; an
//! existing one is never mutated.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use cassia_cql::deserialize::{deserialize_value, DecodeMode};
use cassia_cql::Value;

use crate::engine::{ColumnSpec, RawResult};
use crate::errors::ExecutionError;

/// The result of a statement execution: one page of rows.
#[derive(Debug)]
pub struct QueryResult {
    specs: Arc<[ColumnSpec]>,
    rows: Vec<Vec<Option<Bytes>>>,
    paging_state: Option<Bytes>,
    tracing_id: Option<Uuid>,
    mode: DecodeMode,
}

impl QueryResult {
    pub(crate) fn new(raw: RawResult, mode: DecodeMode) -> Self {
        Self {
            specs: raw.column_specs.into(),
            rows: raw.rows,
            paging_state: raw.paging_state,
            tracing_id: raw.tracing_id,
            mode,
        }
    }

    pub fn column_specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    /// Number of rows in this page.
    pub fn rows_num(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True iff the server left a continuation token: there is (at least
    /// possibly) another page. A token is present even when the next fetch
    /// turns out empty, which happens when the row count is an exact
    /// multiple of the page size.
    pub fn has_more_pages(&self) -> bool {
        self.paging_state.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// The opaque continuation token, to be installed on the originating
    /// statement verbatim via
    /// [`set_paging_state`](crate::statement::Statement::set_paging_state).
    pub fn paging_state(&self) -> Option<&Bytes> {
        self.paging_state.as_ref()
    }

    pub fn tracing_id(&self) -> Option<Uuid> {
        self.tracing_id
    }

    /// Decodes and returns this page's rows. Can be called repeatedly; each
    /// call decodes afresh from the raw cells.
    pub fn rows(&self) -> Result<Vec<Row>, ExecutionError> {
        self.rows
            .iter()
            .map(|raw| Row::decode(raw, &self.specs, self.mode))
            .collect()
    }

    /// The first row, if any.
    pub fn maybe_first_row(&self) -> Result<Option<Row>, ExecutionError> {
        self.rows
            .first()
            .map(|raw| Row::decode(raw, &self.specs, self.mode))
            .transpose()
    }

    pub(crate) fn decode_mode(&self) -> DecodeMode {
        self.mode
    }
}

/// One decoded row, sharing its parent's column specs.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    specs: Arc<[ColumnSpec]>,
    columns: Vec<Value>,
}

impl Row {
    fn decode(
        raw: &[Option<Bytes>],
        specs: &Arc<[ColumnSpec]>,
        mode: DecodeMode,
    ) -> Result<Self, ExecutionError> {
        let columns = raw
            .iter()
            .zip(specs.iter())
            .map(|(cell, spec)| match cell {
                None => Ok(Value::Null),
                Some(bytes) => deserialize_value(bytes, &spec.typ, mode),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            specs: specs.clone(),
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The value at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.columns.get(index)
    }

    /// The value of the column called `name`, if the result has one.
    pub fn column(&self, name: &str) -> Option<&Value> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|index| &self.columns[index])
    }

    /// Consumes the row into its values, in column order.
    pub fn as_values(self) -> Vec<Value> {
        self.columns
    }

    /// `(name, value)` pairs in column order.
    pub fn as_named(&self) -> Vec<(&str, &Value)> {
        self.specs
            .iter()
            .map(|spec| spec.name.as_str())
            .zip(self.columns.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use cassia_cql::cql_type::NativeType;
    use cassia_cql::CqlType;

    use super::*;

    fn int_result(rows: Vec<Vec<Option<Bytes>>>) -> RawResult {
        RawResult {
            column_specs: vec![
                ColumnSpec {
                    name: "id".into(),
                    typ: CqlType::Native(NativeType::Int),
                },
                ColumnSpec {
                    name: "v".into(),
                    typ: CqlType::Native(NativeType::Int),
                },
            ],
            rows,
            paging_state: None,
            tracing_id: None,
        }
    }

    #[test]
    fn rows_decode_with_nulls() {
        let raw = int_result(vec![vec![
            Some(Bytes::from_static(&[0, 0, 0, 1])),
            None,
        ]]);
        let result = QueryResult::new(raw, DecodeMode::Native);
        let rows = result.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column("id"), Some(&Value::Int(1)));
        assert_eq!(rows[0].column("v"), Some(&Value::Null));
        assert_eq!(rows[0].column("missing"), None);
    }

    #[test]
    fn paging_token_presence_drives_has_more_pages() {
        let mut raw = int_result(vec![]);
        raw.paging_state = Some(Bytes::from_static(b"token"));
        assert!(QueryResult::new(raw, DecodeMode::Native).has_more_pages());

        let mut raw = int_result(vec![]);
        raw.paging_state = Some(Bytes::new());
        assert!(!QueryResult::new(raw, DecodeMode::Native).has_more_pages());

        let raw = int_result(vec![]);
        assert!(!QueryResult::new(raw, DecodeMode::Native).has_more_pages());
    }

    #[test]
    fn as_named_pairs_names_with_values() {
        let raw = int_result(vec![vec![
            Some(Bytes::from_static(&[0, 0, 0, 1])),
            Some(Bytes::from_static(&[0, 0, 0, 42])),
        ]]);
        let result = QueryResult::new(raw, DecodeMode::Native);
        let row = result.maybe_first_row().unwrap().unwrap();
        assert_eq!(
            row.as_named(),
            vec![("id", &Value::Int(1)), ("v", &Value::Int(42))]
        );
        assert_eq!(row.as_values(), vec![Value::Int(1), Value::Int(42)]);
    }
}

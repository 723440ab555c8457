//! Bindable statements.
//!
//! One [`Statement`] type covers both raw CQL text and prepared-derived
//! statements. The difference is in what binding can do: a prepared-derived
//! statement knows its bind markers, so values are validated and encoded
//! against the slot's CQL type the moment they are bound, names resolve, and
//! the unset sentinel is available. A raw statement only knows how many
//! slots it has; values encode by their own shape and the server gets the
//! final word.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use cassia_cql::serialize::{serialize_value, serialize_value_untyped};
use cassia_cql::Value;

use crate::engine::{
    ColumnSpec, EncodedStatement, EncodedValue, ExecutionOptions, StatementPayload,
};
use crate::errors::BadQuery;
use crate::statement::{Consistency, SerialConsistency, StatementConfig};

/// Bind-marker metadata shared by a prepared statement and every statement
/// stamped out of it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PreparedMetadata {
    pub(crate) id: Bytes,
    pub(crate) bind_markers: Vec<ColumnSpec>,
    pub(crate) partition_key_indexes: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Unbound,
    Unset,
    Null,
    Cell(Bytes),
}

/// A CQL statement with its bind slots and execution options.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) contents: String,
    pub(crate) prepared: Option<Arc<PreparedMetadata>>,
    slots: Vec<Slot>,
    key_indexes: Vec<usize>,
    pub(crate) config: StatementConfig,
    pub(crate) page_size: Option<i32>,
    pub(crate) paging_state: Option<Bytes>,
}

impl Statement {
    /// Creates a raw statement with `parameter_count` bind slots.
    pub fn new(contents: impl Into<String>, parameter_count: usize) -> Self {
        Self {
            contents: contents.into(),
            prepared: None,
            slots: vec![Slot::Unbound; parameter_count],
            key_indexes: Vec::new(),
            config: StatementConfig::default(),
            page_size: None,
            paging_state: None,
        }
    }

    pub(crate) fn from_prepared(
        contents: String,
        metadata: Arc<PreparedMetadata>,
        config: StatementConfig,
        page_size: Option<i32>,
    ) -> Self {
        let slot_count = metadata.bind_markers.len();
        Self {
            contents,
            prepared: Some(metadata),
            slots: vec![Slot::Unbound; slot_count],
            key_indexes: Vec::new(),
            config,
            page_size,
            paging_state: None,
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn parameter_count(&self) -> usize {
        self.slots.len()
    }

    /// Binds `value` to slot `index`. Binding the same slot again replaces
    /// the previous value.
    ///
    /// On a prepared-derived statement the value is encoded against the
    /// slot's CQL type right here, so a value the type cannot accept fails
    /// immediately. On a raw statement the value encodes by its own shape.
    pub fn bind(&mut self, index: usize, value: impl Into<Value>) -> Result<(), BadQuery> {
        let value = value.into();
        let slot = self.encode_slot(index, &value)?;
        self.slots[index] = slot;
        Ok(())
    }

    /// Binds by bind-marker name; prepared-derived statements only. When
    /// the same name appears several times, the first marker wins.
    pub fn bind_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<(), BadQuery> {
        let index = self.resolve_name(name)?;
        self.bind(index, value)
    }

    /// Binds the unset sentinel: the column is left untouched by the write.
    /// Distinct from binding null, which deletes. Prepared-derived only.
    pub fn bind_unset(&mut self, index: usize) -> Result<(), BadQuery> {
        if self.prepared.is_none() {
            return Err(BadQuery::UnsetOnRawStatement);
        }
        self.check_index(index)?;
        self.slots[index] = Slot::Unset;
        Ok(())
    }

    /// Binds all slots positionally. The number of values must match the
    /// slot count exactly.
    pub fn bind_list<I>(&mut self, values: I) -> Result<(), BadQuery>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != self.slots.len() {
            return Err(BadQuery::ValuesCountMismatch {
                expected: self.slots.len(),
                got: values.len(),
            });
        }
        for (index, value) in values.into_iter().enumerate() {
            self.bind(index, value)?;
        }
        Ok(())
    }

    /// Binds by name from `(name, value)` pairs. Slots not named stay
    /// unbound, but every given name must resolve. Prepared-derived only.
    pub fn bind_dict<I, K>(&mut self, values: I) -> Result<(), BadQuery>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (name, value) in values {
            self.bind_by_name(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Clears every bound slot. On a raw statement the slot array is also
    /// resized to `parameter_count`; a prepared-derived statement keeps the
    /// arity of its bind markers.
    pub fn reset_parameters(&mut self, parameter_count: usize) {
        let count = match &self.prepared {
            Some(metadata) => metadata.bind_markers.len(),
            None => parameter_count,
        };
        self.slots.clear();
        self.slots.resize(count, Slot::Unbound);
    }

    /// Marks slot `index` as part of the partition key, used for token-aware
    /// routing hints on raw statements. Prepared statements know their key
    /// slots already, so the hint is ignored there.
    pub fn add_key_index(&mut self, index: usize) {
        if self.prepared.is_none() {
            self.key_indexes.push(index);
        }
    }

    pub fn set_page_size(&mut self, page_size: i32) {
        self.page_size = Some(page_size);
    }

    pub fn page_size(&self) -> Option<i32> {
        self.page_size
    }

    /// Installs an opaque continuation token from a previous result. The
    /// token round-trips to the engine verbatim.
    pub fn set_paging_state(&mut self, paging_state: Option<Bytes>) {
        self.paging_state = paging_state;
    }

    pub fn set_consistency(&mut self, consistency: Consistency) {
        self.config.consistency = Some(consistency);
    }

    pub fn set_serial_consistency(&mut self, serial_consistency: SerialConsistency) {
        self.config.serial_consistency = Some(serial_consistency);
    }

    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.config.request_timeout = Some(timeout);
    }

    pub fn set_is_idempotent(&mut self, is_idempotent: bool) {
        self.config.is_idempotent = is_idempotent;
    }

    pub fn set_tracing(&mut self, tracing: bool) {
        self.config.tracing = tracing;
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.config.timestamp = Some(timestamp);
    }

    /// Selects a retry policy by name; the name is forwarded to the engine
    /// uninterpreted.
    pub fn set_retry_policy(&mut self, name: impl Into<String>) {
        self.config.retry_policy = Some(name.into());
    }

    /// Selects an execution profile registered on the session.
    pub fn set_execution_profile(&mut self, name: impl Into<String>) {
        self.config.execution_profile = Some(name.into());
    }

    /// Pins execution to a specific host, engine willing.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.config.host = Some(host.into());
    }

    fn check_index(&self, index: usize) -> Result<(), BadQuery> {
        if index >= self.slots.len() {
            return Err(BadQuery::InvalidSlotIndex {
                index,
                count: self.slots.len(),
            });
        }
        Ok(())
    }

    fn resolve_name(&self, name: &str) -> Result<usize, BadQuery> {
        let metadata = self
            .prepared
            .as_ref()
            .ok_or(BadQuery::NameBindingOnRawStatement)?;
        metadata
            .bind_markers
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| BadQuery::NoSuchBindName(name.to_owned()))
    }

    fn encode_slot(&self, index: usize, value: &Value) -> Result<Slot, BadQuery> {
        self.check_index(index)?;
        let cell = match &self.prepared {
            Some(metadata) => serialize_value(value, &metadata.bind_markers[index].typ)?,
            None => serialize_value_untyped(value)?,
        };
        Ok(match cell {
            None => Slot::Null,
            Some(bytes) => Slot::Cell(bytes.into()),
        })
    }

    /// Flattens the statement into its engine form. Every slot must be
    /// bound (or unset) by now.
    pub(crate) fn encoded(
        &self,
        options: ExecutionOptions,
    ) -> Result<EncodedStatement, BadQuery> {
        Ok(EncodedStatement {
            payload: self.payload(),
            values: self.encoded_values()?,
            page_size: self.page_size,
            paging_state: self.paging_state.clone(),
            options,
        })
    }

    pub(crate) fn payload(&self) -> StatementPayload {
        match &self.prepared {
            Some(metadata) => StatementPayload::Prepared(metadata.id.clone()),
            None => StatementPayload::Raw(self.contents.clone()),
        }
    }

    pub(crate) fn encoded_values(&self) -> Result<Vec<EncodedValue>, BadQuery> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Slot::Unbound => Err(BadQuery::UnboundSlot(index)),
                Slot::Unset => Ok(EncodedValue::Unset),
                Slot::Null => Ok(EncodedValue::Null),
                Slot::Cell(bytes) => Ok(EncodedValue::Cell(bytes.clone())),
            })
            .collect()
    }
}

impl From<&str> for Statement {
    /// A parameterless statement from bare CQL text.
    fn from(contents: &str) -> Self {
        Statement::new(contents, 0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use cassia_cql::cql_type::NativeType;
    use cassia_cql::CqlType;

    use super::*;

    fn prepared_metadata(markers: &[(&str, NativeType)]) -> Arc<PreparedMetadata> {
        Arc::new(PreparedMetadata {
            id: Bytes::from_static(b"\x01"),
            bind_markers: markers
                .iter()
                .map(|(name, typ)| ColumnSpec {
                    name: (*name).to_owned(),
                    typ: CqlType::Native(*typ),
                })
                .collect(),
            partition_key_indexes: vec![0],
        })
    }

    fn prepared_statement(markers: &[(&str, NativeType)]) -> Statement {
        Statement::from_prepared(
            "INSERT INTO ks.t (id, v) VALUES (?, ?)".into(),
            prepared_metadata(markers),
            StatementConfig::default(),
            None,
        )
    }

    #[test]
    fn bind_index_is_validated_immediately() {
        let mut statement = Statement::new("SELECT * FROM t WHERE id = ?", 1);
        assert_matches!(
            statement.bind(1, Value::Int(1)),
            Err(BadQuery::InvalidSlotIndex { index: 1, count: 1 })
        );
        statement.bind(0, Value::Int(1)).unwrap();
    }

    #[test]
    fn prepared_bind_encodes_against_slot_type() {
        let mut statement = prepared_statement(&[("id", NativeType::Int)]);
        // In range: fine, including a widening-checked i64.
        statement.bind(0, Value::BigInt(7)).unwrap();
        // Out of range: rejected at bind time, before any engine call.
        assert_matches!(
            statement.bind(0, Value::BigInt(2_147_483_648)),
            Err(BadQuery::Serialization(_))
        );
    }

    #[test]
    fn name_binding_needs_prepared_metadata() {
        let mut raw = Statement::new("SELECT * FROM t WHERE id = ?", 1);
        assert_matches!(
            raw.bind_by_name("id", Value::Int(1)),
            Err(BadQuery::NameBindingOnRawStatement)
        );

        let mut prepared = prepared_statement(&[("id", NativeType::Int)]);
        prepared.bind_by_name("id", Value::Int(1)).unwrap();
        assert_matches!(
            prepared.bind_by_name("nope", Value::Int(1)),
            Err(BadQuery::NoSuchBindName(name)) if name == "nope"
        );
    }

    #[test]
    fn bind_list_requires_exact_arity() {
        let mut statement = prepared_statement(&[("id", NativeType::Int), ("v", NativeType::Int)]);
        assert_matches!(
            statement.bind_list([Value::Int(1)]),
            Err(BadQuery::ValuesCountMismatch {
                expected: 2,
                got: 1
            })
        );
        statement.bind_list([Value::Int(1), Value::Int(2)]).unwrap();
    }

    #[test]
    fn bind_dict_leaves_unnamed_slots_unset() {
        let mut statement = prepared_statement(&[("id", NativeType::Int), ("v", NativeType::Int)]);
        statement
            .bind_dict([("v".to_owned(), Value::Int(2))])
            .unwrap();
        // Slot 0 was never bound, so the statement is not executable yet.
        assert_matches!(
            statement.encoded_values(),
            Err(BadQuery::UnboundSlot(0))
        );
    }

    #[test]
    fn unset_is_prepared_only() {
        let mut raw = Statement::new("UPDATE t SET v = ? WHERE id = 0", 1);
        assert_matches!(raw.bind_unset(0), Err(BadQuery::UnsetOnRawStatement));

        let mut prepared = prepared_statement(&[("v", NativeType::Int)]);
        prepared.bind_unset(0).unwrap();
        assert_eq!(prepared.encoded_values().unwrap(), vec![EncodedValue::Unset]);
    }

    #[test]
    fn reset_resizes_raw_but_not_prepared() {
        let mut raw = Statement::new("q", 1);
        raw.bind(0, Value::Int(1)).unwrap();
        raw.reset_parameters(3);
        assert_eq!(raw.parameter_count(), 3);
        assert_matches!(raw.encoded_values(), Err(BadQuery::UnboundSlot(0)));

        let mut prepared = prepared_statement(&[("id", NativeType::Int)]);
        prepared.bind(0, Value::Int(1)).unwrap();
        prepared.reset_parameters(5);
        assert_eq!(prepared.parameter_count(), 1);
    }

    #[test]
    fn last_bind_wins() {
        let mut statement = prepared_statement(&[("id", NativeType::Int)]);
        statement.bind(0, Value::Int(1)).unwrap();
        statement.bind(0, Value::Int(2)).unwrap();
        assert_eq!(
            statement.encoded_values().unwrap(),
            vec![EncodedValue::Cell(Bytes::from_static(&[0, 0, 0, 2]))]
        );
    }

    #[test]
    fn null_binds_as_null_cell() {
        let mut statement = prepared_statement(&[("v", NativeType::Int)]);
        statement.bind(0, Value::Null).unwrap();
        assert_eq!(statement.encoded_values().unwrap(), vec![EncodedValue::Null]);
    }
}

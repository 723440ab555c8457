//! Serializing [`Value`](crate::value::Value)s into raw CQL cell bytes.

use thiserror::Error;

use crate::cql_type::CqlType;

pub mod value;

pub use value::{serialize_value, serialize_value_untyped};

/// An error that occurred when turning a value into the byte form of a
/// concrete CQL type. Carries the target type so that statement-level
/// errors can point at the offending slot.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to serialize value into CQL type {target}: {kind}")]
pub struct SerializationError {
    pub target: CqlType,
    pub kind: SerializationErrorKind,
}

impl SerializationError {
    pub(crate) fn new(target: &CqlType, kind: SerializationErrorKind) -> Self {
        Self {
            target: target.clone(),
            kind,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializationErrorKind {
    /// The value is numerically out of range for the target type.
    #[error("value does not fit in the target type's range")]
    Overflow,
    /// A textual value failed to parse as the target type.
    #[error("malformed value: {0}")]
    MalformedValue(String),
    /// A string bound into an `ascii` slot contains non-ASCII code points.
    #[error("string contains non-ASCII code points")]
    NonAsciiCodePoint,
    /// The value's shape has no coercion into the target type.
    #[error("no coercion from {found} into the target type")]
    MismatchedType { found: &'static str },
    /// Durations may not be set elements or map keys; the server has no
    /// total order for them.
    #[error("duration is not allowed as a set element or map key")]
    DurationForbidden,
    /// A UDT literal named a field absent from the type definition.
    #[error("user defined type has no field named \"{field}\"")]
    UnknownUdtField { field: String },
    /// A tuple literal with a different number of elements than the type.
    #[error("tuple arity mismatch: type has {expected} elements, value has {got}")]
    TupleArityMismatch { expected: usize, got: usize },
    /// A collection with more elements than the wire format can count.
    #[error("collection too large for the wire format")]
    TooManyElements,
}

//! Deserializing raw CQL cell bytes into [`Value`](crate::value::Value)s.

use thiserror::Error;

use crate::cql_type::CqlType;

pub mod value;

pub use value::deserialize_value;

/// Controls the host-side presentation of decoded temporal, numeric-string
/// and identifier types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Structured wrappers: `CqlDate`, `CqlTimestamp`, `CqlDuration`, ...
    #[default]
    Native,
    /// Canonical strings for date, time, timestamp, duration, decimal,
    /// varint, uuid, timeuuid and inet; everything else as in `Native`.
    Canonical,
}

/// An error that occurred when decoding cell bytes as a concrete CQL type.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to deserialize CQL type {target}: {kind}")]
pub struct DeserializationError {
    pub target: CqlType,
    pub kind: DeserializationErrorKind,
}

impl DeserializationError {
    pub(crate) fn new(target: &CqlType, kind: DeserializationErrorKind) -> Self {
        Self {
            target: target.clone(),
            kind,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeserializationErrorKind {
    /// A fixed-width cell with the wrong number of bytes.
    #[error("expected a cell of {expected} bytes, got {got}")]
    ExpectedExactLength { expected: usize, got: usize },
    /// The cell ended in the middle of a length-prefixed element.
    #[error("cell ends mid-element")]
    CellTruncated,
    /// Bytes left over after the last element of a composite cell.
    #[error("trailing bytes after the last element")]
    TrailingBytes,
    /// A negative element count in a collection cell.
    #[error("negative element count: {0}")]
    BadElementCount(i32),
    /// A text or ascii cell that is not valid UTF-8.
    #[error("cell is not valid UTF-8")]
    InvalidUtf8,
    /// An ascii cell containing non-ASCII code points.
    #[error("ascii cell contains non-ASCII code points")]
    NonAsciiCodePoint,
    /// An inet cell that is neither 4 nor 16 bytes.
    #[error("inet cell of {0} bytes, expected 4 or 16")]
    BadInetLength(usize),
    /// A decoded value outside the range its host representation covers,
    /// e.g. a time outside a day or a date beyond the calendar.
    #[error("value is outside the representable range")]
    OutOfRepresentableRange,
}

//! The crate's error taxonomy and the engine-error classifier.
//!
//! Every failure keeps its origin: a server error carries the server's code
//! and message, a binding mistake names the slot, a codec failure names the
//! target type. Nothing is flattened into a generic error and nothing is
//! retried here - retry decisions belong to the engine.

use thiserror::Error;

use cassia_cql::deserialize::DeserializationError;
use cassia_cql::serialize::SerializationError;

use crate::cluster::metadata::MetadataError;
use crate::engine::{EngineError, ErrorDetails, ErrorOrigin};
use crate::statement::Consistency;

/// An error that occurred while driving a request to completion.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExecutionError {
    /// Caught on the client, before anything crossed the engine boundary.
    #[error("invalid query passed to the session: {0}")]
    BadQuery(#[from] BadQuery),

    /// The server responded with an error frame.
    #[error("database returned an error: {0}, message: {1}")]
    DbError(DbError, String),

    /// Failure while decoding response cells.
    #[error("failed to decode a response: {0}")]
    Deserialization(#[from] DeserializationError),

    /// The engine could not reach or keep a connection to the cluster.
    #[error("connection failure: {0}")]
    ConnectionError(String),

    /// TLS-layer failure inside the engine.
    #[error("TLS failure: {0}")]
    TlsError(String),

    /// The request ran out of time on the client side.
    #[error("request timeout: {0}")]
    RequestTimeout(String),

    /// Engine-local failure that is none of the above.
    #[error("engine client error: {0}")]
    ClientError(String),

    /// The session was closed before the call was made.
    #[error("session is closed")]
    SessionClosed,

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Statement misuse detected before any engine call.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum BadQuery {
    #[error("failed to serialize a bound value: {0}")]
    Serialization(#[from] SerializationError),

    #[error("bind index {index} out of range: statement has {count} slots")]
    InvalidSlotIndex { index: usize, count: usize },

    #[error("no bind marker named \"{0}\"")]
    NoSuchBindName(String),

    #[error("wrong number of values: statement has {expected} slots, {got} values given")]
    ValuesCountMismatch { expected: usize, got: usize },

    /// Name binding needs bind-marker metadata, which only prepared
    /// statements have.
    #[error("binding by name requires a prepared statement")]
    NameBindingOnRawStatement,

    /// The unset sentinel is a prepared-protocol feature.
    #[error("unset values require a prepared statement")]
    UnsetOnRawStatement,

    #[error("slot {0} was never bound")]
    UnboundSlot(usize),
}

/// An error sent back by the database, one variant per CQL error code.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DbError {
    #[error("the submitted query has a syntax error")]
    SyntaxError,

    #[error("the query is syntactically correct but invalid")]
    Invalid,

    #[error("the logged user doesn't have the right to perform the query")]
    Unauthorized,

    #[error("not enough nodes are alive to satisfy required consistency level")]
    Unavailable {
        consistency: Option<Consistency>,
        required: Option<i32>,
        alive: Option<i32>,
    },

    #[error("timeout during a read request")]
    ReadTimeout {
        consistency: Option<Consistency>,
        received: Option<i32>,
        required: Option<i32>,
        data_present: bool,
    },

    #[error("timeout during a write request")]
    WriteTimeout {
        consistency: Option<Consistency>,
        received: Option<i32>,
        required: Option<i32>,
        write_type: Option<String>,
    },

    #[error("a non-timeout failure during a read request")]
    ReadFailure,

    #[error("a non-timeout failure during a write request")]
    WriteFailure,

    #[error("a user defined function failed during execution")]
    FunctionFailure,

    #[error("the request cannot be processed because the coordinator is overloaded")]
    Overloaded,

    #[error("the coordinator is still bootstrapping")]
    IsBootstrapping,

    #[error("error during truncate")]
    TruncateError,

    #[error("authentication error")]
    AuthenticationError,

    #[error("the table or keyspace to create already exists")]
    AlreadyExists,

    #[error("can not process the query because of a configuration issue")]
    ConfigError,

    #[error("the prepared statement id is unknown to the coordinator")]
    Unprepared,

    #[error("internal server error; this indicates a server-side bug")]
    ServerError,

    #[error("a protocol-level error between engine and server")]
    ProtocolError,

    #[error("unknown server error code: {0:#06x}")]
    Other(u16),
}

impl DbError {
    /// The classifier proper: CQL error code plus optional structured
    /// details into a concrete variant. The mapping is total and stable;
    /// in particular 0x2000 is always a syntax error and never
    /// an invalid-query error.
    fn from_code(code: u16, details: Option<&ErrorDetails>) -> DbError {
        let d = |f: fn(&ErrorDetails) -> Option<i32>| details.and_then(f);
        match code {
            0x0000 => DbError::ServerError,
            0x000A => DbError::ProtocolError,
            0x0100 => DbError::AuthenticationError,
            0x1000 => DbError::Unavailable {
                consistency: details.and_then(|d| d.consistency),
                required: d(|d| d.required),
                alive: d(|d| d.alive),
            },
            0x1001 => DbError::Overloaded,
            0x1002 => DbError::IsBootstrapping,
            0x1003 => DbError::TruncateError,
            0x1100 => DbError::WriteTimeout {
                consistency: details.and_then(|d| d.consistency),
                received: d(|d| d.received),
                required: d(|d| d.required),
                write_type: details.and_then(|d| d.write_type.clone()),
            },
            0x1200 => DbError::ReadTimeout {
                consistency: details.and_then(|d| d.consistency),
                received: d(|d| d.received),
                required: d(|d| d.required),
                data_present: details.and_then(|d| d.data_present).unwrap_or(false),
            },
            0x1300 => DbError::ReadFailure,
            0x1400 => DbError::FunctionFailure,
            0x1500 => DbError::WriteFailure,
            0x2000 => DbError::SyntaxError,
            0x2100 => DbError::Unauthorized,
            0x2200 => DbError::Invalid,
            0x2300 => DbError::ConfigError,
            0x2400 => DbError::AlreadyExists,
            0x2500 => DbError::Unprepared,
            other => DbError::Other(other),
        }
    }
}

impl From<EngineError> for ExecutionError {
    fn from(err: EngineError) -> Self {
        match err.origin {
            ErrorOrigin::Server => {
                let db = match err.code {
                    Some(code) => DbError::from_code(code, err.details.as_ref()),
                    None => DbError::ServerError,
                };
                ExecutionError::DbError(db, err.message)
            }
            ErrorOrigin::Connection => ExecutionError::ConnectionError(err.message),
            ErrorOrigin::Tls => ExecutionError::TlsError(err.message),
            ErrorOrigin::Timeout => ExecutionError::RequestTimeout(err.message),
            ErrorOrigin::Client => ExecutionError::ClientError(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn server_error(code: u16) -> EngineError {
        EngineError {
            origin: ErrorOrigin::Server,
            code: Some(code),
            message: "boom".into(),
            details: None,
        }
    }

    #[test]
    fn syntax_code_is_always_syntax() {
        for _ in 0..3 {
            assert_matches!(
                ExecutionError::from(server_error(0x2000)),
                ExecutionError::DbError(DbError::SyntaxError, msg) if msg == "boom"
            );
        }
        assert_matches!(
            ExecutionError::from(server_error(0x2200)),
            ExecutionError::DbError(DbError::Invalid, _)
        );
    }

    #[test]
    fn consistency_details_survive_classification() {
        let err = EngineError {
            origin: ErrorOrigin::Server,
            code: Some(0x1100),
            message: "write timed out".into(),
            details: Some(ErrorDetails {
                consistency: Some(Consistency::Quorum),
                received: Some(1),
                required: Some(2),
                alive: None,
                data_present: None,
                write_type: Some("SIMPLE".into()),
            }),
        };
        assert_matches!(
            ExecutionError::from(err),
            ExecutionError::DbError(
                DbError::WriteTimeout {
                    consistency: Some(Consistency::Quorum),
                    received: Some(1),
                    required: Some(2),
                    write_type: Some(wt),
                },
                _
            ) if wt == "SIMPLE"
        );
    }

    #[test]
    fn unknown_code_keeps_the_code() {
        assert_matches!(
            ExecutionError::from(server_error(0x7777)),
            ExecutionError::DbError(DbError::Other(0x7777), _)
        );
    }

    #[test]
    fn non_server_origins_map_by_origin() {
        let mk = |origin| EngineError {
            origin,
            code: None,
            message: "m".into(),
            details: None,
        };
        assert_matches!(
            ExecutionError::from(mk(ErrorOrigin::Connection)),
            ExecutionError::ConnectionError(_)
        );
        assert_matches!(
            ExecutionError::from(mk(ErrorOrigin::Tls)),
            ExecutionError::TlsError(_)
        );
        assert_matches!(
            ExecutionError::from(mk(ErrorOrigin::Timeout)),
            ExecutionError::RequestTimeout(_)
        );
        assert_matches!(
            ExecutionError::from(mk(ErrorOrigin::Client)),
            ExecutionError::ClientError(_)
        );
    }
}

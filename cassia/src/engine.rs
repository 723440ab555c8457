//! The driver engine boundary.
//!
//! [`DriverEngine`] is the seam between this crate and whatever moves bytes
//! to the cluster: connection pooling, host discovery, load balancing,
//! retries and the wire protocol all live on the far side of it. This crate
//! hands the engine fully encoded statements and gets back raw cells; it
//! never sees a socket.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use cassia_cql::CqlType;

use crate::cluster::metadata::ClusterMetadata;
use crate::observability::metrics::SessionMetrics;
use crate::observability::{HostEvent, LogMessage};
use crate::statement::{Consistency, SerialConsistency};

/// Name and CQL type of one bind marker or one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub typ: CqlType,
}

/// A bind slot's payload after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedValue {
    /// Leave the column untouched (prepared statements only).
    Unset,
    Null,
    Cell(Bytes),
}

/// What the engine should run: raw CQL text or a previously prepared id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementPayload {
    Raw(String),
    Prepared(Bytes),
}

/// Options resolved from the statement and its execution profile; the engine
/// consumes them verbatim. Retry policy and load balancing hints are inert
/// names here, interpreted (or ignored) by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOptions {
    pub consistency: Option<Consistency>,
    pub serial_consistency: Option<SerialConsistency>,
    pub request_timeout: Option<Duration>,
    pub is_idempotent: bool,
    pub tracing: bool,
    pub timestamp: Option<i64>,
    pub retry_policy: Option<String>,
    pub load_balancing: Option<String>,
    pub host: Option<String>,
}

/// A fully encoded statement, ready to cross the engine boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedStatement {
    pub payload: StatementPayload,
    pub values: Vec<EncodedValue>,
    pub page_size: Option<i32>,
    pub paging_state: Option<Bytes>,
    pub options: ExecutionOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Logged,
    Unlogged,
    Counter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBatch {
    pub kind: BatchKind,
    pub statements: Vec<(StatementPayload, Vec<EncodedValue>)>,
    pub options: ExecutionOptions,
}

/// Everything the client needs to bind against a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInfo {
    pub id: Bytes,
    pub bind_markers: Vec<ColumnSpec>,
    pub partition_key_indexes: Vec<u16>,
}

/// One raw row: one optional cell per result column, `None` for null.
pub type RawRow = Vec<Option<Bytes>>;

/// An undecoded response page.
#[derive(Debug, Clone, Default)]
pub struct RawResult {
    pub column_specs: Vec<ColumnSpec>,
    pub rows: Vec<RawRow>,
    /// `Some` and non-empty iff the server has more pages.
    pub paging_state: Option<Bytes>,
    pub tracing_id: Option<Uuid>,
}

/// Which side of the engine a failure came from. Server failures carry a
/// protocol error code in [`EngineError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    Server,
    Connection,
    Tls,
    Timeout,
    Client,
}

/// Consistency-failure details the server attaches to unavailable and
/// timeout errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub consistency: Option<Consistency>,
    pub received: Option<i32>,
    pub required: Option<i32>,
    pub alive: Option<i32>,
    pub data_present: Option<bool>,
    pub write_type: Option<String>,
}

/// The engine's single failure type. The classifier in
/// [`crate::errors`] turns it into the crate's error taxonomy; origin and
/// code are preserved verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("engine failure ({origin:?}, code {code:?}): {message}")]
pub struct EngineError {
    pub origin: ErrorOrigin,
    pub code: Option<u16>,
    pub message: String,
    pub details: Option<ErrorDetails>,
}

pub type LogListener = Box<dyn Fn(LogMessage) + Send + Sync>;
pub type HostEventListener = Box<dyn Fn(HostEvent) + Send + Sync>;

/// The transport this crate drives. Implementations wrap an actual CQL
/// driver core; tests use an in-memory fake.
#[async_trait]
pub trait DriverEngine: Send + Sync + 'static {
    async fn prepare(&self, query: &str) -> Result<PreparedInfo, EngineError>;

    async fn execute(&self, statement: EncodedStatement) -> Result<RawResult, EngineError>;

    async fn execute_batch(&self, batch: EncodedBatch) -> Result<RawResult, EngineError>;

    /// Releases engine resources. Further calls must fail with a
    /// client-origin error.
    async fn close(&self) -> Result<(), EngineError>;

    /// A fresh view of the cluster schema, assembled by the engine from the
    /// system tables.
    async fn schema_snapshot(&self) -> Result<ClusterMetadata, EngineError>;

    fn session_metrics(&self) -> SessionMetrics;

    /// Registers a listener for the engine's out-of-band log messages.
    fn subscribe_log(&self, listener: LogListener);

    /// Registers a listener for host up/down/added/removed events.
    fn subscribe_host_events(&self, listener: HostEventListener);
}

//! Batch statements.

use std::time::Duration;

use crate::engine::{BatchKind, EncodedBatch, ExecutionOptions};
use crate::errors::BadQuery;
use crate::statement::{Consistency, SerialConsistency, Statement, StatementConfig};

/// The kind of a batch, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchType {
    #[default]
    Logged,
    Unlogged,
    Counter,
}

impl BatchType {
    pub(crate) fn kind(self) -> BatchKind {
        match self {
            BatchType::Logged => BatchKind::Logged,
            BatchType::Unlogged => BatchKind::Unlogged,
            BatchType::Counter => BatchKind::Counter,
        }
    }
}

/// An ordered group of statements executed as one request. Whether a counter
/// batch may contain a given statement is the server's rule; a violation
/// comes back as a server error for the whole batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    batch_type: BatchType,
    statements: Vec<Statement>,
    pub(crate) config: StatementConfig,
}

impl Batch {
    pub fn new(batch_type: BatchType) -> Self {
        Self {
            batch_type,
            ..Default::default()
        }
    }

    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    /// Appends a statement; its bound values travel with it. Per-statement
    /// execution options are ignored inside a batch, the batch-level ones
    /// apply.
    pub fn append_statement(&mut self, statement: impl Into<Statement>) {
        self.statements.push(statement.into());
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
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

    pub fn set_execution_profile(&mut self, name: impl Into<String>) {
        self.config.execution_profile = Some(name.into());
    }

    pub(crate) fn encoded(&self, options: ExecutionOptions) -> Result<EncodedBatch, BadQuery> {
        let statements = self
            .statements
            .iter()
            .map(|statement| Ok((statement.payload(), statement.encoded_values()?)))
            .collect::<Result<_, BadQuery>>()?;
        Ok(EncodedBatch {
            kind: self.batch_type.kind(),
            statements,
            options,
        })
    }
}

//! Prepared statements.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::engine::{ColumnSpec, PreparedInfo};
use crate::statement::unprepared::PreparedMetadata;
use crate::statement::{Consistency, SerialConsistency, Statement, StatementConfig};

/// A statement prepared by the engine: an opaque id plus ordered bind-marker
/// metadata. Immutable; [`bind`](Self::bind) stamps out fresh, independently
/// bindable [`Statement`]s that inherit the options set here.
#[derive(Debug, Clone)]
pub struct PreparedStatement {
    metadata: Arc<PreparedMetadata>,
    contents: String,
    config: StatementConfig,
    page_size: Option<i32>,
}

impl PreparedStatement {
    pub(crate) fn new(contents: String, info: PreparedInfo) -> Self {
        Self {
            metadata: Arc::new(PreparedMetadata {
                id: info.id,
                bind_markers: info.bind_markers,
                partition_key_indexes: info.partition_key_indexes,
            }),
            contents,
            config: StatementConfig::default(),
            page_size: None,
        }
    }

    /// A fresh statement over this prepared id, all slots unbound.
    pub fn bind(&self) -> Statement {
        Statement::from_prepared(
            self.contents.clone(),
            self.metadata.clone(),
            self.config.clone(),
            self.page_size,
        )
    }

    /// The engine-assigned prepared statement id.
    pub fn id(&self) -> &Bytes {
        &self.metadata.id
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Ordered `(name, type)` metadata of the bind markers.
    pub fn bind_markers(&self) -> &[ColumnSpec] {
        &self.metadata.bind_markers
    }

    /// Which bind slots form the partition key.
    pub fn partition_key_indexes(&self) -> &[u16] {
        &self.metadata.partition_key_indexes
    }

    pub fn parameter_count(&self) -> usize {
        self.metadata.bind_markers.len()
    }

    pub fn set_page_size(&mut self, page_size: i32) {
        self.page_size = Some(page_size);
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
}

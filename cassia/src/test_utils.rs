//! An in-memory driver engine for tests.
//!
//! Plays a tiny cluster: `INSERT` statements append their bound cells as a
//! row, `SELECT` statements page through the accumulated rows. Every
//! encoded statement that crosses the boundary is recorded so tests can
//! assert on what (and how often) would have hit the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::cluster::metadata::ClusterMetadata;
use crate::engine::{
    ColumnSpec, DriverEngine, EncodedBatch, EncodedStatement, EncodedValue, EngineError,
    ErrorOrigin, HostEventListener, LogListener, PreparedInfo, RawResult, RawRow,
    StatementPayload,
};
use crate::observability::metrics::SessionMetrics;

pub(crate) fn setup_tracing() {
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(tracing_subscriber::fmt::TestWriter::new())
        .try_init();
}

#[derive(Default)]
pub(crate) struct MockEngine {
    /// Bind markers reported for every prepared query.
    pub(crate) bind_markers: Vec<ColumnSpec>,
    /// Column specs of SELECT responses.
    pub(crate) result_specs: Vec<ColumnSpec>,
    pub(crate) schema: ClusterMetadata,

    pub(crate) rows: Mutex<Vec<RawRow>>,
    pub(crate) executions: Mutex<Vec<EncodedStatement>>,
    pub(crate) next_error: Mutex<Option<EngineError>>,

    prepared_texts: Mutex<HashMap<Bytes, String>>,
    prepare_calls: AtomicU32,
    next_prepared_id: AtomicU32,
    closed: AtomicBool,
}

impl MockEngine {
    pub(crate) fn new(bind_markers: Vec<ColumnSpec>, result_specs: Vec<ColumnSpec>) -> Self {
        Self {
            bind_markers,
            result_specs,
            ..Default::default()
        }
    }

    pub(crate) fn preload_rows(&self, rows: Vec<RawRow>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub(crate) fn fail_next_with(&self, error: EngineError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn execution_count(&self) -> usize {
        self.executions.lock().unwrap().len()
    }

    pub(crate) fn prepare_count(&self) -> u32 {
        self.prepare_calls.load(Ordering::SeqCst)
    }

    fn query_text(&self, payload: &StatementPayload) -> String {
        match payload {
            StatementPayload::Raw(text) => text.clone(),
            StatementPayload::Prepared(id) => self
                .prepared_texts
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn select_page(&self, statement: &EncodedStatement) -> RawResult {
        let rows = self.rows.lock().unwrap();
        let offset = statement
            .paging_state
            .as_ref()
            .map(|token| {
                let mut be = [0u8; 4];
                be.copy_from_slice(token);
                u32::from_be_bytes(be) as usize
            })
            .unwrap_or(0);
        let page = statement
            .page_size
            .map(|p| p as usize)
            .unwrap_or(usize::MAX);
        let end = rows.len().min(offset.saturating_add(page));
        let paging_state = (end - offset == page)
            .then(|| Bytes::copy_from_slice(&(end as u32).to_be_bytes()));
        RawResult {
            column_specs: self.result_specs.clone(),
            rows: rows[offset..end].to_vec(),
            paging_state,
            tracing_id: None,
        }
    }

    fn take_error(&self) -> Option<EngineError> {
        self.next_error.lock().unwrap().take()
    }

    fn check_closed(&self) -> Result<(), EngineError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngineError {
                origin: ErrorOrigin::Client,
                code: None,
                message: "engine is closed".into(),
                details: None,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DriverEngine for MockEngine {
    async fn prepare(&self, query: &str) -> Result<PreparedInfo, EngineError> {
        self.check_closed()?;
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        self.prepare_calls.fetch_add(1, Ordering::SeqCst);
        let id = Bytes::copy_from_slice(
            &self
                .next_prepared_id
                .fetch_add(1, Ordering::SeqCst)
                .to_be_bytes(),
        );
        self.prepared_texts
            .lock()
            .unwrap()
            .insert(id.clone(), query.to_owned());
        Ok(PreparedInfo {
            id,
            bind_markers: self.bind_markers.clone(),
            partition_key_indexes: vec![0],
        })
    }

    async fn execute(&self, statement: EncodedStatement) -> Result<RawResult, EngineError> {
        self.check_closed()?;
        self.executions.lock().unwrap().push(statement.clone());
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        let text = self.query_text(&statement.payload);
        if text.starts_with("INSERT") {
            let row = statement
                .values
                .iter()
                .map(|value| match value {
                    EncodedValue::Cell(bytes) => Some(bytes.clone()),
                    EncodedValue::Null | EncodedValue::Unset => None,
                })
                .collect();
            self.rows.lock().unwrap().push(row);
            return Ok(RawResult::default());
        }
        if text.starts_with("SELECT") {
            return Ok(self.select_page(&statement));
        }
        Ok(RawResult::default())
    }

    async fn execute_batch(&self, batch: EncodedBatch) -> Result<RawResult, EngineError> {
        self.check_closed()?;
        if let Some(error) = self.take_error() {
            return Err(error);
        }
        for (payload, values) in batch.statements {
            self.execute(EncodedStatement {
                payload,
                values,
                page_size: None,
                paging_state: None,
                options: batch.options.clone(),
            })
            .await?;
        }
        Ok(RawResult::default())
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn schema_snapshot(&self) -> Result<ClusterMetadata, EngineError> {
        self.check_closed()?;
        Ok(self.schema.clone())
    }

    fn session_metrics(&self) -> SessionMetrics {
        SessionMetrics::default()
    }

    fn subscribe_log(&self, _listener: LogListener) {}

    fn subscribe_host_events(&self, _listener: HostEventListener) {}
}

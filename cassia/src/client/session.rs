//! The session: the crate's execution front door.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, trace};
use uuid::Uuid;

use cassia_cql::deserialize::DecodeMode;

use crate::client::execution_profile::ExecutionProfile;
use crate::client::pager::{row_stream, RowStream};
use crate::cluster::metadata::ClusterMetadata;
use crate::engine::{DriverEngine, ExecutionOptions};
use crate::errors::ExecutionError;
use crate::observability::metrics::SessionMetrics;
use crate::observability::{emit_engine_log, emit_host_event};
use crate::response::query_result::QueryResult;
use crate::statement::{Batch, PreparedStatement, Statement, StatementConfig};

/// Configuration of a [`Session`], assembled by
/// [`SessionBuilder`](crate::client::session_builder::SessionBuilder).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub decode_mode: DecodeMode,
    /// Applied to statements that set no page size of their own.
    pub default_page_size: Option<i32>,
    pub default_profile: ExecutionProfile,
    pub profiles: HashMap<String, ExecutionProfile>,
    /// Forward engine logs and host events into `tracing`.
    pub bridge_engine_logs: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decode_mode: DecodeMode::Native,
            default_page_size: Some(5000),
            default_profile: ExecutionProfile::default(),
            profiles: HashMap::new(),
            bridge_engine_logs: true,
        }
    }
}

/// A handle to the cluster, shareable across tasks. All I/O goes through the
/// engine; the session owns binding, decoding, paging, metadata snapshots
/// and the error taxonomy.
pub struct Session {
    engine: Arc<dyn DriverEngine>,
    config: SessionConfig,
    metadata: ArcSwap<ClusterMetadata>,
    closed: AtomicBool,
    client_id: Uuid,
}

impl Session {
    /// Wires the session up and takes the first schema snapshot.
    pub(crate) async fn connect(
        engine: Arc<dyn DriverEngine>,
        config: SessionConfig,
    ) -> Result<Self, ExecutionError> {
        if config.bridge_engine_logs {
            engine.subscribe_log(Box::new(|msg| emit_engine_log(&msg)));
            engine.subscribe_host_events(Box::new(|event| emit_host_event(&event)));
        }
        let metadata = engine.schema_snapshot().await?;
        let session = Self {
            engine,
            config,
            metadata: ArcSwap::from_pointee(metadata),
            closed: AtomicBool::new(false),
            client_id: Uuid::new_v4(),
        };
        debug!(client_id = %session.client_id, "session established");
        Ok(session)
    }

    /// A random id identifying this session instance.
    pub fn get_client_id(&self) -> Uuid {
        self.client_id
    }

    /// Prepares a query on the cluster.
    pub async fn prepare(
        &self,
        query: impl Into<String>,
    ) -> Result<PreparedStatement, ExecutionError> {
        self.check_open()?;
        let query = query.into();
        trace!(query = %query, "preparing statement");
        let info = self.engine.prepare(&query).await?;
        Ok(PreparedStatement::new(query, info))
    }

    /// Executes a statement and returns its first page.
    ///
    /// For the next page, install
    /// [`paging_state`](QueryResult::paging_state) on the statement and
    /// execute again; for transparent cross-page iteration use
    /// [`execute_iter`](Self::execute_iter).
    pub async fn execute(&self, statement: &Statement) -> Result<QueryResult, ExecutionError> {
        self.check_open()?;
        let options = self.resolve_options(&statement.config)?;
        let mut encoded = statement.encoded(options)?;
        if encoded.page_size.is_none() {
            encoded.page_size = self.config.default_page_size;
        }
        trace!(query = %statement.contents(), "executing statement");
        let raw = self.engine.execute(encoded).await?;
        Ok(QueryResult::new(raw, self.config.decode_mode))
    }

    /// Executes a statement as a stream of rows, fetching pages on demand.
    /// The first fetch happens on first poll.
    pub fn execute_iter(&self, statement: Statement) -> Result<RowStream, ExecutionError> {
        self.check_open()?;
        let options = self.resolve_options(&statement.config)?;
        let mut encoded = statement.encoded(options)?;
        if encoded.page_size.is_none() {
            encoded.page_size = self.config.default_page_size;
        }
        Ok(row_stream(
            self.engine.clone(),
            encoded,
            self.config.decode_mode,
        ))
    }

    /// Executes a batch as a single request.
    pub async fn batch(&self, batch: &Batch) -> Result<QueryResult, ExecutionError> {
        self.check_open()?;
        let options = self.resolve_options(&batch.config)?;
        let encoded = batch.encoded(options)?;
        trace!(statements = encoded.statements.len(), "executing batch");
        let raw = self.engine.execute_batch(encoded).await?;
        Ok(QueryResult::new(raw, self.config.decode_mode))
    }

    /// Switches the session keyspace.
    pub async fn set_keyspace(&self, keyspace: &str) -> Result<(), ExecutionError> {
        let statement = Statement::new(format!("USE {keyspace}"), 0);
        self.execute(&statement).await.map(|_| ())
    }

    /// The current schema snapshot; lock-free, never blocks a refresh.
    pub fn metadata(&self) -> Arc<ClusterMetadata> {
        self.metadata.load_full()
    }

    /// Replaces the schema snapshot with a fresh one from the engine.
    pub async fn refresh_metadata(&self) -> Result<(), ExecutionError> {
        self.check_open()?;
        trace!("refreshing schema metadata");
        let fresh = self.engine.schema_snapshot().await?;
        self.metadata.store(Arc::new(fresh));
        Ok(())
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.engine.session_metrics()
    }

    /// Closes the session. Later executions fail synchronously, before any
    /// engine call.
    pub async fn close(&self) -> Result<(), ExecutionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!(client_id = %self.client_id, "closing session");
        self.engine.close().await?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> Result<(), ExecutionError> {
        if self.is_closed() {
            return Err(ExecutionError::SessionClosed);
        }
        Ok(())
    }

    /// Statement options win over the named profile's, which win over the
    /// default profile's.
    fn resolve_options(
        &self,
        config: &StatementConfig,
    ) -> Result<ExecutionOptions, ExecutionError> {
        let profile = match &config.execution_profile {
            None => &self.config.default_profile,
            Some(name) => self.config.profiles.get(name).ok_or_else(|| {
                ExecutionError::ClientError(format!("unknown execution profile \"{name}\""))
            })?,
        };
        let default = &self.config.default_profile;
        Ok(ExecutionOptions {
            consistency: config
                .consistency
                .or(profile.consistency)
                .or(default.consistency),
            serial_consistency: config
                .serial_consistency
                .or(profile.serial_consistency)
                .or(default.serial_consistency),
            request_timeout: config
                .request_timeout
                .or(profile.request_timeout)
                .or(default.request_timeout),
            is_idempotent: config.is_idempotent,
            tracing: config.tracing,
            timestamp: config.timestamp,
            retry_policy: config
                .retry_policy
                .clone()
                .or_else(|| profile.retry_policy.clone())
                .or_else(|| default.retry_policy.clone()),
            load_balancing: profile
                .load_balancing
                .clone()
                .or_else(|| default.load_balancing.clone()),
            host: config.host.clone(),
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("client_id", &self.client_id)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

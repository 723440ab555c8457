//! Building a [`Session`].

use std::sync::Arc;

use cassia_cql::deserialize::DecodeMode;

use crate::client::execution_profile::ExecutionProfile;
use crate::client::session::{Session, SessionConfig};
use crate::engine::DriverEngine;
use crate::errors::ExecutionError;

/// Fluent construction of a [`Session`] over a driver engine.
///
/// ```rust,ignore
/// let session = SessionBuilder::new(engine)
///     .decode_mode(DecodeMode::Canonical)
///     .default_page_size(100)
///     .build()
///     .await?;
/// ```
pub struct SessionBuilder {
    engine: Arc<dyn DriverEngine>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new(engine: Arc<dyn DriverEngine>) -> Self {
        Self {
            engine,
            config: SessionConfig::default(),
        }
    }

    /// How decoded values are presented: structured wrappers or canonical
    /// strings.
    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.config.decode_mode = mode;
        self
    }

    /// Page size used by statements that set none. `None` lets the engine
    /// decide.
    pub fn default_page_size(mut self, page_size: impl Into<Option<i32>>) -> Self {
        self.config.default_page_size = page_size.into();
        self
    }

    /// The profile used when a statement selects none.
    pub fn default_execution_profile(mut self, profile: ExecutionProfile) -> Self {
        self.config.default_profile = profile;
        self
    }

    /// Registers a named profile for per-statement selection.
    pub fn execution_profile(
        mut self,
        name: impl Into<String>,
        profile: ExecutionProfile,
    ) -> Self {
        self.config.profiles.insert(name.into(), profile);
        self
    }

    /// Disables forwarding engine logs and host events into `tracing`.
    pub fn without_engine_log_bridge(mut self) -> Self {
        self.config.bridge_engine_logs = false;
        self
    }

    /// Connects: wires up observability and takes the first schema
    /// snapshot.
    pub async fn build(self) -> Result<Session, ExecutionError> {
        Session::connect(self.engine, self.config).await
    }
}

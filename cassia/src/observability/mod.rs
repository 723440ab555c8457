//! Log forwarding, host events and session metrics.

pub mod metrics;

use chrono::{DateTime, Utc};

/// Severity of an engine log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

/// An out-of-band log message emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    /// Source location inside the engine, when it reports one.
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub message: String,
}

/// A host state change reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Up(String),
    Down(String),
    Added(String),
    Removed(String),
}

/// Forwards one engine log message into the `tracing` ecosystem, mapping
/// levels one to one (critical folds into error).
pub(crate) fn emit_engine_log(msg: &LogMessage) {
    let function = msg.function.as_deref().unwrap_or("");
    match msg.level {
        LogLevel::Trace => tracing::trace!(target: "cassia::engine", function, "{}", msg.message),
        LogLevel::Debug => tracing::debug!(target: "cassia::engine", function, "{}", msg.message),
        LogLevel::Info => tracing::info!(target: "cassia::engine", function, "{}", msg.message),
        LogLevel::Warn => tracing::warn!(target: "cassia::engine", function, "{}", msg.message),
        LogLevel::Error | LogLevel::Critical => {
            tracing::error!(target: "cassia::engine", function, "{}", msg.message)
        }
    }
}

/// Logs a host state change at the level the event warrants.
pub(crate) fn emit_host_event(event: &HostEvent) {
    match event {
        HostEvent::Up(host) => tracing::info!(target: "cassia::engine", host, "host is up"),
        HostEvent::Down(host) => tracing::warn!(target: "cassia::engine", host, "host is down"),
        HostEvent::Added(host) => tracing::info!(target: "cassia::engine", host, "host added"),
        HostEvent::Removed(host) => {
            tracing::info!(target: "cassia::engine", host, "host removed")
        }
    }
}

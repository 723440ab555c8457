//! Async CQL client library over a pluggable driver engine.
//!
//! The crate composes parameterized CQL statements, binds strongly typed
//! values, executes them asynchronously and iterates paginated results.
//! Everything touching the network - connections, host discovery, load
//! balancing, retries, TLS, the wire protocol itself - lives behind the
//! [`DriverEngine`](engine::DriverEngine) trait; this crate owns the value
//! codec, the binding rules, paging, the schema metadata model with its DDL
//! renderer, and the error taxonomy.
//!
//! The entry point is [`SessionBuilder`](client::session_builder::SessionBuilder):
//!
//! ```rust,ignore
//! let session = SessionBuilder::new(engine).build().await?;
//! let prepared = session.prepare("SELECT v FROM ks.t WHERE id = ?").await?;
//! let mut statement = prepared.bind();
//! statement.bind_by_name("id", Value::Int(1))?;
//! let result = session.execute(&statement).await?;
//! ```

pub mod client;
pub mod cluster;
pub mod engine;
pub mod errors;
pub mod observability;
pub mod response;
pub mod statement;

pub use cassia_cql::deserialize::DecodeMode;
pub use cassia_cql::value::Value;

pub use client::session::Session;
pub use client::session_builder::SessionBuilder;
pub use errors::ExecutionError;
pub use response::query_result::{QueryResult, Row};

#[cfg(test)]
mod test_utils;

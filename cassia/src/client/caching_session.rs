//! A session wrapper that prepares on first use and caches the result.

use dashmap::DashMap;

use cassia_cql::Value;

use crate::client::session::Session;
use crate::errors::ExecutionError;
use crate::response::query_result::QueryResult;
use crate::statement::PreparedStatement;

/// Wraps a [`Session`] with a query-text keyed cache of prepared
/// statements, so callers can fire query strings repeatedly without
/// managing preparation themselves.
#[derive(Debug)]
pub struct CachingSession {
    session: Session,
    max_capacity: usize,
    cache: DashMap<String, PreparedStatement>,
}

impl CachingSession {
    pub fn from(session: Session, max_capacity: usize) -> Self {
        Self {
            session,
            max_capacity,
            cache: DashMap::new(),
        }
    }

    /// Prepares through the cache, binds `values` positionally and
    /// executes.
    pub async fn execute(
        &self,
        query: &str,
        values: &[Value],
    ) -> Result<QueryResult, ExecutionError> {
        let prepared = self.add_prepared_statement(query).await?;
        let mut statement = prepared.bind();
        statement.bind_list(values.iter().cloned())?;
        self.session.execute(&statement).await
    }

    /// Returns the cached prepared statement for `query`, preparing and
    /// inserting it first if needed.
    pub async fn add_prepared_statement(
        &self,
        query: &str,
    ) -> Result<PreparedStatement, ExecutionError> {
        if let Some(prepared) = self.cache.get(query) {
            return Ok(prepared.clone());
        }
        let prepared = self.session.prepare(query).await?;
        if self.cache.len() >= self.max_capacity {
            // Evict an arbitrary entry to stay within capacity.
            let victim = self.cache.iter().next().map(|e| e.key().clone());
            if let Some(victim) = victim {
                self.cache.remove(&victim);
            }
        }
        self.cache.insert(query.to_owned(), prepared.clone());
        Ok(prepared)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

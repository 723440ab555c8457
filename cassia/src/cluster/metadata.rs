//! The schema metadata model.
//!
//! An immutable tree: cluster → keyspaces → {user types, functions,
//! aggregates, tables} → {columns, indexes, views}. The engine assembles a
//! whole tree from the system tables on every schema event and the session
//! swaps it in atomically; nothing in here is ever mutated in place, so
//! readers need no locks.
//!
//! Column and field types are kept as CQL source strings (`frozen<address>`,
//! `list<int>`), exactly as the system tables report them: the model's only
//! consumer of types is the DDL renderer, which needs the source spelling.
//! Maps are `BTreeMap` throughout so the rendered DDL is deterministic.

use std::collections::BTreeMap;

use thiserror::Error;

/// A failed lookup in the metadata tree. One variant per entity kind, so
/// callers can tell a missing table from a missing keyspace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("keyspace \"{0}\" not found")]
    KeyspaceNotFound(String),
    #[error("table \"{1}\" not found in keyspace \"{0}\"")]
    TableNotFound(String, String),
    #[error("index \"{1}\" not found in keyspace \"{0}\"")]
    IndexNotFound(String, String),
    #[error("materialized view \"{1}\" not found in keyspace \"{0}\"")]
    ViewNotFound(String, String),
    #[error("user defined type \"{1}\" not found in keyspace \"{0}\"")]
    UserTypeNotFound(String, String),
    #[error("function \"{1}\" not found in keyspace \"{0}\"")]
    FunctionNotFound(String, String),
    #[error("aggregate \"{1}\" not found in keyspace \"{0}\"")]
    AggregateNotFound(String, String),
}

/// One consistent snapshot of the cluster schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterMetadata {
    pub keyspaces: BTreeMap<String, Keyspace>,
}

impl ClusterMetadata {
    pub fn keyspace_names(&self) -> impl Iterator<Item = &str> {
        self.keyspaces.keys().map(String::as_str)
    }

    pub fn keyspace(&self, name: &str) -> Result<&Keyspace, MetadataError> {
        self.keyspaces
            .get(name)
            .ok_or_else(|| MetadataError::KeyspaceNotFound(name.to_owned()))
    }

    pub fn table(&self, keyspace: &str, name: &str) -> Result<&Table, MetadataError> {
        self.keyspace(keyspace)?.table(name)
    }

    pub fn user_type(&self, keyspace: &str, name: &str) -> Result<&UserType, MetadataError> {
        self.keyspace(keyspace)?.user_type(name)
    }

    pub fn function(&self, keyspace: &str, name: &str) -> Result<&Function, MetadataError> {
        self.keyspace(keyspace)?.function(name)
    }

    pub fn aggregate(&self, keyspace: &str, name: &str) -> Result<&Aggregate, MetadataError> {
        self.keyspace(keyspace)?.aggregate(name)
    }

    pub fn view(&self, keyspace: &str, name: &str) -> Result<&MaterializedView, MetadataError> {
        self.keyspace(keyspace)?.view(name)
    }

    pub fn index(&self, keyspace: &str, name: &str) -> Result<&Index, MetadataError> {
        self.keyspace(keyspace)?.index(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyspace {
    pub name: String,
    /// Replication strategy options, `class` included.
    pub replication: BTreeMap<String, String>,
    pub durable_writes: bool,
    pub user_types: BTreeMap<String, UserType>,
    pub functions: BTreeMap<String, Function>,
    pub aggregates: BTreeMap<String, Aggregate>,
    pub tables: BTreeMap<String, Table>,
}

impl Keyspace {
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table(&self, name: &str) -> Result<&Table, MetadataError> {
        self.tables
            .get(name)
            .ok_or_else(|| MetadataError::TableNotFound(self.name.clone(), name.to_owned()))
    }

    pub fn user_type(&self, name: &str) -> Result<&UserType, MetadataError> {
        self.user_types
            .get(name)
            .ok_or_else(|| MetadataError::UserTypeNotFound(self.name.clone(), name.to_owned()))
    }

    pub fn function(&self, name: &str) -> Result<&Function, MetadataError> {
        self.functions
            .get(name)
            .ok_or_else(|| MetadataError::FunctionNotFound(self.name.clone(), name.to_owned()))
    }

    pub fn aggregate(&self, name: &str) -> Result<&Aggregate, MetadataError> {
        self.aggregates
            .get(name)
            .ok_or_else(|| MetadataError::AggregateNotFound(self.name.clone(), name.to_owned()))
    }

    pub fn view(&self, name: &str) -> Result<&MaterializedView, MetadataError> {
        self.tables
            .values()
            .find_map(|table| table.views.get(name))
            .ok_or_else(|| MetadataError::ViewNotFound(self.name.clone(), name.to_owned()))
    }

    pub fn index(&self, name: &str) -> Result<&Index, MetadataError> {
        self.tables
            .values()
            .find_map(|table| table.indexes.get(name))
            .ok_or_else(|| MetadataError::IndexNotFound(self.name.clone(), name.to_owned()))
    }
}

/// A user defined type; field types are CQL source strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserType {
    pub keyspace: String,
    pub name: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub keyspace: String,
    pub name: String,
    pub argument_names: Vec<String>,
    pub argument_types: Vec<String>,
    pub return_type: String,
    pub language: String,
    pub body: String,
    pub called_on_null_input: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub keyspace: String,
    pub name: String,
    pub argument_types: Vec<String>,
    pub state_func: String,
    pub state_type: String,
    pub final_func: String,
    pub initcond: String,
    pub return_type: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    #[default]
    Regular,
    Static,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusteringOrder {
    #[default]
    None,
    Asc,
    Desc,
}

impl ClusteringOrder {
    pub(crate) fn keyword(self) -> Option<&'static str> {
        match self {
            ClusteringOrder::None => None,
            ClusteringOrder::Asc => Some("ASC"),
            ClusteringOrder::Desc => Some("DESC"),
        }
    }
}

/// A column; `typ` is the CQL source spelling of the type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub typ: String,
    pub kind: ColumnKind,
    pub clustering_order: ClusteringOrder,
}

/// Storage options shared by tables and materialized views.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub bloom_filter_fp_chance: f64,
    pub caching: BTreeMap<String, String>,
    pub comment: String,
    pub compaction: BTreeMap<String, String>,
    pub compression: BTreeMap<String, String>,
    pub crc_check_chance: f64,
    pub default_time_to_live: i32,
    pub gc_grace_seconds: i32,
    pub max_index_interval: i32,
    pub memtable_flush_period_in_ms: i32,
    pub min_index_interval: i32,
    pub speculative_retry: String,
}

impl Default for TableOptions {
    /// Server-side defaults of a freshly created table.
    fn default() -> Self {
        Self {
            bloom_filter_fp_chance: 0.01,
            caching: BTreeMap::from([
                ("keys".to_owned(), "ALL".to_owned()),
                ("rows_per_partition".to_owned(), "NONE".to_owned()),
            ]),
            comment: String::new(),
            compaction: BTreeMap::from([(
                "class".to_owned(),
                "SizeTieredCompactionStrategy".to_owned(),
            )]),
            compression: BTreeMap::new(),
            crc_check_chance: 1.0,
            default_time_to_live: 0,
            gc_grace_seconds: 864_000,
            max_index_interval: 2048,
            memtable_flush_period_in_ms: 0,
            min_index_interval: 128,
            speculative_retry: "99.0PERCENTILE".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub keyspace: String,
    pub name: String,
    /// In definition order: partition key, clustering key, then the rest.
    pub columns: Vec<Column>,
    pub indexes: BTreeMap<String, Index>,
    pub views: BTreeMap<String, MaterializedView>,
    pub options: TableOptions,
}

impl Table {
    /// Names of the primary key columns: partition key then clustering key.
    pub(crate) fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, ColumnKind::PartitionKey | ColumnKind::Clustering))
            .map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub keyspace: String,
    pub table: String,
    pub name: String,
    /// The indexed target, already in CQL form (a column name or an
    /// expression like `values(m)`).
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterializedView {
    pub keyspace: String,
    pub name: String,
    pub base_table_name: String,
    pub include_all_columns: bool,
    pub where_clause: String,
    pub columns: Vec<Column>,
    pub options: TableOptions,
}

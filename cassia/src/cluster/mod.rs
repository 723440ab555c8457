//! Cluster schema metadata and DDL rendering.

pub mod ddl;
pub mod metadata;

pub use ddl::DdlOptions;
pub use metadata::{ClusterMetadata, Keyspace, MetadataError, Table};

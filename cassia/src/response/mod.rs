//! Views over engine responses.

pub mod query_result;

pub use query_result::{QueryResult, Row};

//! CQL data types and the value codec for the cassia driver.
//!
//! This crate defines the [`CqlType`](cql_type::CqlType) descriptors, the
//! [`Value`](value::Value) sum type that bridges host values and CQL-typed
//! cells, and the bidirectional codec between the two:
//! [`serialize`](serialize::value::serialize_value) turns a `Value` into the
//! raw cell bytes the driver engine puts on the wire, and
//! [`deserialize`](deserialize::value::deserialize_value) turns raw cell
//! bytes back into a `Value`, with a presentation switch between structured
//! wrappers and canonical strings.
//!
//! Everything here is synchronous and performs no I/O.

pub mod cql_type;
pub mod value;

pub mod deserialize;
pub mod serialize;

mod vint;

pub use cql_type::{CqlType, NativeType};
pub use value::Value;

//! CQL type descriptors.
//!
//! Every [`Value`](crate::value::Value) is encoded or decoded against one of
//! these descriptors; decoding raw cell bytes without a descriptor is
//! meaningless.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

/// A native (non-composite) CQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NativeType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Time,
    Timestamp,
    Timeuuid,
    TinyInt,
    Uuid,
    Varint,
}

impl NativeType {
    /// The lowercase CQL name of the type, as it appears in DDL.
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeType::Ascii => "ascii",
            NativeType::BigInt => "bigint",
            NativeType::Blob => "blob",
            NativeType::Boolean => "boolean",
            NativeType::Counter => "counter",
            NativeType::Date => "date",
            NativeType::Decimal => "decimal",
            NativeType::Double => "double",
            NativeType::Duration => "duration",
            NativeType::Float => "float",
            NativeType::Inet => "inet",
            NativeType::Int => "int",
            NativeType::SmallInt => "smallint",
            NativeType::Text => "text",
            NativeType::Time => "time",
            NativeType::Timestamp => "timestamp",
            NativeType::Timeuuid => "timeuuid",
            NativeType::TinyInt => "tinyint",
            NativeType::Uuid => "uuid",
            NativeType::Varint => "varint",
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Definition of a user defined type: a named, ordered list of fields,
/// each with its own CQL type.
///
/// Shared behind an [`Arc`] because the same definition is referenced by
/// every column and every nested collection that uses the UDT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtDefinition {
    pub keyspace: String,
    pub name: String,
    pub fields: Vec<(String, CqlType)>,
}

/// A CQL type descriptor: native, collection, tuple or user defined.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CqlType {
    Native(NativeType),
    List(Box<CqlType>),
    Set(Box<CqlType>),
    Map(Box<CqlType>, Box<CqlType>),
    Tuple(Vec<CqlType>),
    UserDefinedType(Arc<UdtDefinition>),
}

impl CqlType {
    /// True for the `duration` native type. Durations are rejected as set
    /// elements and map keys, so this check appears at the codec seams.
    pub fn is_duration(&self) -> bool {
        matches!(self, CqlType::Native(NativeType::Duration))
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlType::Native(native) => write!(f, "{native}"),
            CqlType::List(elem) => write!(f, "list<{elem}>"),
            CqlType::Set(elem) => write!(f, "set<{elem}>"),
            CqlType::Map(key, value) => write!(f, "map<{key}, {value}>"),
            CqlType::Tuple(elems) => {
                write!(f, "tuple<{}>", elems.iter().join(", "))
            }
            CqlType::UserDefinedType(udt) => write!(f, "{}.{}", udt.keyspace, udt.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_composite_type_names() {
        let typ = CqlType::Map(
            Box::new(CqlType::Native(NativeType::Text)),
            Box::new(CqlType::Tuple(vec![
                CqlType::Native(NativeType::Int),
                CqlType::Native(NativeType::Uuid),
            ])),
        );
        assert_eq!(typ.to_string(), "map<text, tuple<int, uuid>>");
    }

    #[test]
    fn render_udt_name() {
        let typ = CqlType::UserDefinedType(Arc::new(UdtDefinition {
            keyspace: "ks".into(),
            name: "address".into(),
            fields: vec![("street".into(), CqlType::Native(NativeType::Text))],
        }));
        assert_eq!(typ.to_string(), "ks.address");
    }
}

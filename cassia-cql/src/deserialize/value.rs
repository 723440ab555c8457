//! The cell decoder.
//!
//! Decoding is driven entirely by the [`CqlType`] descriptor; the cell bytes
//! carry no type information of their own. The [`DecodeMode`] switch picks
//! between structured wrappers and canonical strings for the types that have
//! both presentations.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ReadBytesExt};
use num_bigint::BigInt;
use uuid::Uuid;

use crate::cql_type::{CqlType, NativeType};
use crate::value::{
    Counter, CqlDate, CqlDecimal, CqlDuration, CqlTime, CqlTimestamp, CqlTimeuuid, CqlVarint,
    Value, NANOS_IN_DAY,
};
use crate::vint::vint_decode;

use super::{DecodeMode, DeserializationError, DeserializationErrorKind};

/// Decodes one non-null cell of type `typ`.
///
/// Null cells never reach this function: on the wire a null is a negative
/// length marker with no bytes, and the row decoder maps it to
/// [`Value::Null`] before the cell codec is involved. A zero-length cell of
/// a non-string type decodes to [`Value::Empty`].
pub fn deserialize_value(
    cell: &[u8],
    typ: &CqlType,
    mode: DecodeMode,
) -> Result<Value, DeserializationError> {
    if cell.is_empty() && !is_stringlike(typ) {
        return Ok(Value::Empty);
    }
    match typ {
        CqlType::Native(native) => deserialize_native(cell, *native, typ, mode),
        CqlType::List(elem) => {
            Ok(Value::List(deserialize_sequence(cell, elem, typ, mode)?))
        }
        CqlType::Set(elem) => {
            Ok(Value::Set(deserialize_sequence(cell, elem, typ, mode)?))
        }
        CqlType::Map(key, val) => {
            let mut buf = cell;
            let count = read_count(&mut buf, typ)?;
            let mut pairs = Vec::with_capacity(count);
            for _ in 0..count {
                let k = read_element(&mut buf, key, typ, mode)?;
                let v = read_element(&mut buf, val, typ, mode)?;
                pairs.push((k, v));
            }
            ensure_consumed(buf, typ)?;
            Ok(Value::Map(pairs))
        }
        CqlType::Tuple(elem_types) => {
            let mut buf = cell;
            let mut elems = Vec::with_capacity(elem_types.len());
            for elem_typ in elem_types {
                // The server may omit trailing tuple elements.
                if buf.is_empty() {
                    elems.push(Value::Null);
                } else {
                    elems.push(read_element(&mut buf, elem_typ, typ, mode)?);
                }
            }
            ensure_consumed(buf, typ)?;
            Ok(Value::Tuple(elems))
        }
        CqlType::UserDefinedType(udt) => {
            let mut buf = cell;
            let mut fields = Vec::with_capacity(udt.fields.len());
            for (name, field_typ) in &udt.fields {
                // Fields added to the type after the row was written are
                // absent from old cells.
                let value = if buf.is_empty() {
                    Value::Null
                } else {
                    read_element(&mut buf, field_typ, typ, mode)?
                };
                fields.push((name.clone(), value));
            }
            ensure_consumed(buf, typ)?;
            Ok(Value::Udt {
                keyspace: udt.keyspace.clone(),
                name: udt.name.clone(),
                fields,
            })
        }
    }
}

fn is_stringlike(typ: &CqlType) -> bool {
    matches!(
        typ,
        CqlType::Native(NativeType::Text | NativeType::Ascii | NativeType::Blob)
    )
}

fn deserialize_native(
    cell: &[u8],
    native: NativeType,
    typ: &CqlType,
    mode: DecodeMode,
) -> Result<Value, DeserializationError> {
    Ok(match native {
        NativeType::Boolean => Value::Boolean(exact::<1>(cell, typ)?[0] != 0),
        NativeType::TinyInt => Value::TinyInt(i8::from_be_bytes(exact(cell, typ)?)),
        NativeType::SmallInt => Value::SmallInt(i16::from_be_bytes(exact(cell, typ)?)),
        NativeType::Int => Value::Int(i32::from_be_bytes(exact(cell, typ)?)),
        NativeType::BigInt => Value::BigInt(i64::from_be_bytes(exact(cell, typ)?)),
        NativeType::Counter => Value::Counter(Counter(i64::from_be_bytes(exact(cell, typ)?))),
        NativeType::Float => Value::Float(f32::from_be_bytes(exact(cell, typ)?)),
        NativeType::Double => Value::Double(f64::from_be_bytes(exact(cell, typ)?)),
        NativeType::Blob => Value::Blob(cell.to_vec()),
        NativeType::Text => Value::Text(decode_utf8(cell, typ)?),
        NativeType::Ascii => {
            let s = decode_utf8(cell, typ)?;
            if !s.is_ascii() {
                return Err(DeserializationError::new(
                    typ,
                    DeserializationErrorKind::NonAsciiCodePoint,
                ));
            }
            Value::Ascii(s)
        }
        NativeType::Uuid => {
            let uuid = Uuid::from_bytes(exact(cell, typ)?);
            match mode {
                DecodeMode::Native => Value::Uuid(uuid),
                DecodeMode::Canonical => Value::Text(uuid.to_string()),
            }
        }
        NativeType::Timeuuid => {
            let uuid = CqlTimeuuid::from_bytes(exact(cell, typ)?);
            match mode {
                DecodeMode::Native => Value::Timeuuid(uuid),
                DecodeMode::Canonical => Value::Text(uuid.to_string()),
            }
        }
        NativeType::Inet => {
            let addr = match cell.len() {
                4 => IpAddr::V4(Ipv4Addr::from(exact::<4>(cell, typ)?)),
                16 => IpAddr::V6(Ipv6Addr::from(exact::<16>(cell, typ)?)),
                other => {
                    return Err(DeserializationError::new(
                        typ,
                        DeserializationErrorKind::BadInetLength(other),
                    ))
                }
            };
            match mode {
                DecodeMode::Native => Value::Inet(addr),
                DecodeMode::Canonical => Value::Text(addr.to_string()),
            }
        }
        NativeType::Date => {
            let date = CqlDate(u32::from_be_bytes(exact(cell, typ)?));
            match mode {
                DecodeMode::Native => Value::Date(date),
                DecodeMode::Canonical => {
                    Value::Text(date.canonical().map_err(|_| out_of_range(typ))?)
                }
            }
        }
        NativeType::Time => {
            let time = CqlTime(i64::from_be_bytes(exact(cell, typ)?));
            if !(0..NANOS_IN_DAY).contains(&time.0) {
                return Err(out_of_range(typ));
            }
            match mode {
                DecodeMode::Native => Value::Time(time),
                DecodeMode::Canonical => {
                    Value::Text(time.canonical().map_err(|_| out_of_range(typ))?)
                }
            }
        }
        NativeType::Timestamp => {
            let timestamp = CqlTimestamp(i64::from_be_bytes(exact(cell, typ)?));
            match mode {
                DecodeMode::Native => Value::Timestamp(timestamp),
                DecodeMode::Canonical => {
                    Value::Text(timestamp.canonical().map_err(|_| out_of_range(typ))?)
                }
            }
        }
        NativeType::Duration => {
            let (months, rest) = vint_decode(cell).ok_or_else(|| truncated(typ))?;
            let (days, rest) = vint_decode(rest).ok_or_else(|| truncated(typ))?;
            let (nanoseconds, rest) = vint_decode(rest).ok_or_else(|| truncated(typ))?;
            ensure_consumed(rest, typ)?;
            let duration = CqlDuration {
                months: i32::try_from(months).map_err(|_| out_of_range(typ))?,
                days: i32::try_from(days).map_err(|_| out_of_range(typ))?,
                nanoseconds,
            };
            match mode {
                DecodeMode::Native => Value::Duration(duration),
                DecodeMode::Canonical => Value::Text(duration.to_string()),
            }
        }
        NativeType::Decimal => {
            let mut buf = cell;
            let scale = buf
                .read_i32::<BigEndian>()
                .map_err(|_| truncated(typ))?;
            let decimal = CqlDecimal::from_signed_be_bytes_and_exponent(buf.to_vec(), scale);
            match mode {
                DecodeMode::Native => Value::Decimal(decimal),
                DecodeMode::Canonical => Value::Text(decimal.to_string()),
            }
        }
        NativeType::Varint => {
            let varint = CqlVarint::from_signed_bytes_be_slice(cell);
            match mode {
                DecodeMode::Native => Value::Varint(varint),
                DecodeMode::Canonical => {
                    Value::Text(BigInt::from_signed_bytes_be(cell).to_string())
                }
            }
        }
    })
}

fn deserialize_sequence(
    cell: &[u8],
    elem_typ: &CqlType,
    typ: &CqlType,
    mode: DecodeMode,
) -> Result<Vec<Value>, DeserializationError> {
    let mut buf = cell;
    let count = read_count(&mut buf, typ)?;
    let mut elems = Vec::with_capacity(count);
    for _ in 0..count {
        elems.push(read_element(&mut buf, elem_typ, typ, mode)?);
    }
    ensure_consumed(buf, typ)?;
    Ok(elems)
}

/// Reads one `[length: i32][bytes]` element; a negative length is a null
/// element.
fn read_element(
    buf: &mut &[u8],
    elem_typ: &CqlType,
    typ: &CqlType,
    mode: DecodeMode,
) -> Result<Value, DeserializationError> {
    let len = buf
        .read_i32::<BigEndian>()
        .map_err(|_| truncated(typ))?;
    if len < 0 {
        return Ok(Value::Null);
    }
    let len = len as usize;
    if buf.len() < len {
        return Err(truncated(typ));
    }
    let (cell, rest) = buf.split_at(len);
    *buf = rest;
    deserialize_value(cell, elem_typ, mode)
}

fn read_count(buf: &mut &[u8], typ: &CqlType) -> Result<usize, DeserializationError> {
    let count = buf
        .read_i32::<BigEndian>()
        .map_err(|_| truncated(typ))?;
    usize::try_from(count).map_err(|_| {
        DeserializationError::new(typ, DeserializationErrorKind::BadElementCount(count))
    })
}

fn exact<const N: usize>(cell: &[u8], typ: &CqlType) -> Result<[u8; N], DeserializationError> {
    cell.try_into().map_err(|_| {
        DeserializationError::new(
            typ,
            DeserializationErrorKind::ExpectedExactLength {
                expected: N,
                got: cell.len(),
            },
        )
    })
}

fn decode_utf8(cell: &[u8], typ: &CqlType) -> Result<String, DeserializationError> {
    String::from_utf8(cell.to_vec())
        .map_err(|_| DeserializationError::new(typ, DeserializationErrorKind::InvalidUtf8))
}

fn ensure_consumed(rest: &[u8], typ: &CqlType) -> Result<(), DeserializationError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(DeserializationError::new(
            typ,
            DeserializationErrorKind::TrailingBytes,
        ))
    }
}

fn truncated(typ: &CqlType) -> DeserializationError {
    DeserializationError::new(typ, DeserializationErrorKind::CellTruncated)
}

fn out_of_range(typ: &CqlType) -> DeserializationError {
    DeserializationError::new(typ, DeserializationErrorKind::OutOfRepresentableRange)
}

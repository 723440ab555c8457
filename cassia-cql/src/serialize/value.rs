//! The typed value encoder.
//!
//! [`serialize_value`] checks and coerces a [`Value`] against a [`CqlType`]
//! descriptor and produces the raw cell bytes, so that a misbound statement
//! fails at bind time rather than after a network round trip.
//! [`serialize_value_untyped`] encodes a value by its own shape alone, for
//! statements whose slot types are unknown to the client; the server is then
//! the one to reject a shape it cannot use.

use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

use crate::cql_type::{CqlType, NativeType, UdtDefinition};
use crate::value::{CqlDate, CqlDecimal, CqlDuration, CqlTime, Value, NANOS_IN_DAY};
use crate::vint::vint_encode;

use super::{SerializationError, SerializationErrorKind};

/// Serializes `value` as a cell of type `typ`.
///
/// Returns `Ok(None)` for [`Value::Null`]: the null cell has no bytes, only
/// a negative length marker, which the slot writer emits itself.
pub fn serialize_value(
    value: &Value,
    typ: &CqlType,
) -> Result<Option<Vec<u8>>, SerializationError> {
    match value {
        Value::Null => Ok(None),
        Value::Empty => Ok(Some(Vec::new())),
        _ => {
            let mut buf = Vec::new();
            serialize_into(value, typ, &mut buf)?;
            Ok(Some(buf))
        }
    }
}

/// Serializes `value` by its own variant, with no type descriptor.
///
/// Every variant has exactly one natural encoding; the only possible
/// failure is a collection with more elements than the wire format can
/// count. Whether the server accepts the bytes for the actual column type
/// is the server's call.
pub fn serialize_value_untyped(value: &Value) -> Result<Option<Vec<u8>>, SerializationError> {
    match value {
        Value::Null => Ok(None),
        Value::Empty => Ok(Some(Vec::new())),
        _ => {
            let mut buf = Vec::new();
            serialize_untyped_into(value, &mut buf)?;
            Ok(Some(buf))
        }
    }
}

fn serialize_into(
    value: &Value,
    typ: &CqlType,
    buf: &mut Vec<u8>,
) -> Result<(), SerializationError> {
    match typ {
        CqlType::Native(native) => serialize_native(value, *native, typ, buf),
        CqlType::List(elem) => {
            let elems = match value {
                Value::List(v) | Value::Set(v) => v,
                other => return Err(mismatched(typ, other)),
            };
            serialize_sequence(elems, elem, typ, buf)
        }
        CqlType::Set(elem) => {
            if elem.is_duration() {
                return Err(SerializationError::new(
                    typ,
                    SerializationErrorKind::DurationForbidden,
                ));
            }
            let elems = match value {
                Value::List(v) | Value::Set(v) => v,
                other => return Err(mismatched(typ, other)),
            };
            serialize_sequence(elems, elem, typ, buf)
        }
        CqlType::Map(key, val) => {
            if key.is_duration() {
                return Err(SerializationError::new(
                    typ,
                    SerializationErrorKind::DurationForbidden,
                ));
            }
            let pairs = match value {
                Value::Map(pairs) => pairs,
                other => return Err(mismatched(typ, other)),
            };
            write_count(pairs.len(), typ, buf)?;
            for (k, v) in pairs {
                write_nested(k, key, buf)?;
                write_nested(v, val, buf)?;
            }
            Ok(())
        }
        CqlType::Tuple(elem_types) => {
            let elems = match value {
                Value::Tuple(v) => v,
                other => return Err(mismatched(typ, other)),
            };
            if elems.len() != elem_types.len() {
                return Err(SerializationError::new(
                    typ,
                    SerializationErrorKind::TupleArityMismatch {
                        expected: elem_types.len(),
                        got: elems.len(),
                    },
                ));
            }
            for (elem, elem_typ) in elems.iter().zip(elem_types) {
                write_nested(elem, elem_typ, buf)?;
            }
            Ok(())
        }
        CqlType::UserDefinedType(udt) => {
            let fields = match value {
                Value::Udt { fields, .. } => fields,
                other => return Err(mismatched(typ, other)),
            };
            serialize_udt(fields, udt, typ, buf)
        }
    }
}

/// UDT cells are written in definition order. A field the caller did not
/// provide becomes null; a field the definition does not know is an error.
fn serialize_udt(
    fields: &[(String, Value)],
    udt: &UdtDefinition,
    typ: &CqlType,
    buf: &mut Vec<u8>,
) -> Result<(), SerializationError> {
    for (provided, _) in fields {
        if !udt.fields.iter().any(|(name, _)| name == provided) {
            return Err(SerializationError::new(
                typ,
                SerializationErrorKind::UnknownUdtField {
                    field: provided.clone(),
                },
            ));
        }
    }
    for (name, field_typ) in &udt.fields {
        match fields.iter().find(|(provided, _)| provided == name) {
            Some((_, value)) => write_nested(value, field_typ, buf)?,
            None => write_cell(None, buf),
        }
    }
    Ok(())
}

fn serialize_sequence(
    elems: &[Value],
    elem_typ: &CqlType,
    typ: &CqlType,
    buf: &mut Vec<u8>,
) -> Result<(), SerializationError> {
    write_count(elems.len(), typ, buf)?;
    for elem in elems {
        write_nested(elem, elem_typ, buf)?;
    }
    Ok(())
}

/// Writes one nested cell: `[length: i32][bytes]`, length -1 for null.
fn write_nested(
    value: &Value,
    typ: &CqlType,
    buf: &mut Vec<u8>,
) -> Result<(), SerializationError> {
    let cell = serialize_value(value, typ)?;
    if cell.as_ref().is_some_and(|b| i32::try_from(b.len()).is_err()) {
        return Err(SerializationError::new(
            typ,
            SerializationErrorKind::Overflow,
        ));
    }
    write_cell(cell.as_deref(), buf);
    Ok(())
}

fn write_cell(cell: Option<&[u8]>, buf: &mut Vec<u8>) {
    match cell {
        None => buf.extend_from_slice(&(-1i32).to_be_bytes()),
        Some(bytes) => {
            buf.extend_from_slice(&(bytes.len() as i32).to_be_bytes());
            buf.extend_from_slice(bytes);
        }
    }
}

fn write_count(count: usize, typ: &CqlType, buf: &mut Vec<u8>) -> Result<(), SerializationError> {
    let count = i32::try_from(count).map_err(|_| {
        SerializationError::new(typ, SerializationErrorKind::TooManyElements)
    })?;
    buf.extend_from_slice(&count.to_be_bytes());
    Ok(())
}

fn serialize_native(
    value: &Value,
    native: NativeType,
    typ: &CqlType,
    buf: &mut Vec<u8>,
) -> Result<(), SerializationError> {
    match native {
        NativeType::Boolean => match value {
            Value::Boolean(b) => buf.push(*b as u8),
            other => return Err(mismatched(typ, other)),
        },
        NativeType::Blob => match value {
            Value::Blob(bytes) => buf.extend_from_slice(bytes),
            other => return Err(mismatched(typ, other)),
        },
        NativeType::TinyInt => {
            let v = coerce_i64(value, typ)?;
            let v = i8::try_from(v).map_err(|_| overflow(typ))?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::SmallInt => {
            let v = coerce_i64(value, typ)?;
            let v = i16::try_from(v).map_err(|_| overflow(typ))?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::Int => {
            let v = coerce_i64(value, typ)?;
            let v = i32::try_from(v).map_err(|_| overflow(typ))?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::BigInt | NativeType::Counter => {
            let v = coerce_i64(value, typ)?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::Float => {
            let v = coerce_f64(value, typ)? as f32;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::Double => {
            let v = coerce_f64(value, typ)?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        NativeType::Text => {
            let s = coerce_text(value, typ)?;
            buf.extend_from_slice(s.as_bytes());
        }
        NativeType::Ascii => {
            let s = coerce_text(value, typ)?;
            if !s.is_ascii() {
                return Err(SerializationError::new(
                    typ,
                    SerializationErrorKind::NonAsciiCodePoint,
                ));
            }
            buf.extend_from_slice(s.as_bytes());
        }
        NativeType::Uuid | NativeType::Timeuuid => {
            // A plain UUID in a timeuuid slot (and the reverse) is passed
            // through; the variant bits are the server's business.
            let uuid = match value {
                Value::Uuid(u) => *u,
                Value::Timeuuid(u) => (*u).into(),
                Value::Text(s) | Value::Ascii(s) => {
                    Uuid::from_str(s).map_err(|e| malformed(typ, e))?
                }
                other => return Err(mismatched(typ, other)),
            };
            buf.extend_from_slice(uuid.as_bytes());
        }
        NativeType::Inet => {
            let addr = match value {
                Value::Inet(a) => *a,
                Value::Text(s) | Value::Ascii(s) => {
                    IpAddr::from_str(s).map_err(|e| malformed(typ, e))?
                }
                other => return Err(mismatched(typ, other)),
            };
            match addr {
                IpAddr::V4(v4) => buf.extend_from_slice(&v4.octets()),
                IpAddr::V6(v6) => buf.extend_from_slice(&v6.octets()),
            }
        }
        NativeType::Date => {
            let date = coerce_date(value, typ)?;
            buf.extend_from_slice(&date.0.to_be_bytes());
        }
        NativeType::Time => {
            let time = coerce_time(value, typ)?;
            if !(0..NANOS_IN_DAY).contains(&time.0) {
                return Err(overflow(typ));
            }
            buf.extend_from_slice(&time.0.to_be_bytes());
        }
        NativeType::Timestamp => {
            let millis = coerce_timestamp_millis(value, typ)?;
            buf.extend_from_slice(&millis.to_be_bytes());
        }
        NativeType::Duration => {
            let duration = match value {
                Value::Duration(d) => *d,
                Value::Text(s) | Value::Ascii(s) => {
                    CqlDuration::from_str(s).map_err(|e| malformed(typ, e))?
                }
                other => return Err(mismatched(typ, other)),
            };
            vint_encode(duration.months as i64, buf);
            vint_encode(duration.days as i64, buf);
            vint_encode(duration.nanoseconds, buf);
        }
        NativeType::Decimal => {
            let decimal = coerce_decimal(value, typ)?;
            let (unscaled, scale) = decimal.as_signed_be_bytes_slice_and_exponent();
            buf.extend_from_slice(&scale.to_be_bytes());
            buf.extend_from_slice(unscaled);
        }
        NativeType::Varint => {
            let big = coerce_varint(value, typ)?;
            buf.extend_from_slice(&big.to_signed_bytes_be());
        }
    }
    Ok(())
}

/// Integer coercion shared by all fixed-width integer targets: integer
/// variants pass through, floats truncate the fraction, strings must parse
/// as a pure integer (a fractional string is malformed, not truncated).
fn coerce_i64(value: &Value, typ: &CqlType) -> Result<i64, SerializationError> {
    match value {
        Value::TinyInt(v) => Ok(*v as i64),
        Value::SmallInt(v) => Ok(*v as i64),
        Value::Int(v) => Ok(*v as i64),
        Value::BigInt(v) => Ok(*v),
        Value::Counter(c) => Ok(c.0),
        Value::Float(f) => float_to_i64(*f as f64, typ),
        Value::Double(f) => float_to_i64(*f, typ),
        Value::Text(s) | Value::Ascii(s) => s.parse().map_err(|e| malformed(typ, e)),
        other => Err(mismatched(typ, other)),
    }
}

fn float_to_i64(f: f64, typ: &CqlType) -> Result<i64, SerializationError> {
    let truncated = f.trunc();
    if !truncated.is_finite()
        || truncated < i64::MIN as f64
        || truncated >= 9_223_372_036_854_775_808.0
    {
        return Err(overflow(typ));
    }
    Ok(truncated as i64)
}

fn coerce_f64(value: &Value, typ: &CqlType) -> Result<f64, SerializationError> {
    match value {
        Value::Float(f) => Ok(*f as f64),
        Value::Double(f) => Ok(*f),
        Value::TinyInt(v) => Ok(*v as f64),
        Value::SmallInt(v) => Ok(*v as f64),
        Value::Int(v) => Ok(*v as f64),
        Value::BigInt(v) => Ok(*v as f64),
        Value::Text(s) | Value::Ascii(s) => s.parse().map_err(|e| malformed(typ, e)),
        other => Err(mismatched(typ, other)),
    }
}

/// Strings pass through; numbers and date/time values stringify to the same
/// canonical forms the decoder produces.
fn coerce_text(value: &Value, typ: &CqlType) -> Result<String, SerializationError> {
    match value {
        Value::Text(s) | Value::Ascii(s) => Ok(s.clone()),
        Value::TinyInt(v) => Ok(v.to_string()),
        Value::SmallInt(v) => Ok(v.to_string()),
        Value::Int(v) => Ok(v.to_string()),
        Value::BigInt(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(v.to_string()),
        Value::Double(v) => Ok(v.to_string()),
        Value::Date(d) => d.canonical().map_err(|_| overflow(typ)),
        Value::Time(t) => t.canonical().map_err(|_| overflow(typ)),
        Value::Timestamp(t) => t.canonical().map_err(|_| overflow(typ)),
        other => Err(mismatched(typ, other)),
    }
}

/// Numbers bound into a date slot are seconds since the Unix epoch; the day
/// boundary is taken by floor division so negative instants land on the
/// correct (earlier) day.
fn coerce_date(value: &Value, typ: &CqlType) -> Result<CqlDate, SerializationError> {
    let days = match value {
        Value::Date(d) => return Ok(*d),
        Value::Text(s) | Value::Ascii(s) => {
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(date.into());
            }
            // A full datetime string is accepted too; only its date part
            // (after offset normalization) is kept.
            parse_timestamp_string(s, typ)?.div_euclid(86_400_000)
        }
        Value::TinyInt(v) => (*v as i64).div_euclid(86_400),
        Value::SmallInt(v) => (*v as i64).div_euclid(86_400),
        Value::Int(v) => (*v as i64).div_euclid(86_400),
        Value::BigInt(v) => v.div_euclid(86_400),
        Value::Float(f) => float_to_i64((*f as f64).div_euclid(86_400.0), typ)?,
        Value::Double(f) => float_to_i64(f.div_euclid(86_400.0), typ)?,
        other => return Err(mismatched(typ, other)),
    };
    CqlDate::from_days_since_epoch(days).map_err(|_| overflow(typ))
}

/// Numbers bound into a time slot are seconds since midnight, with the
/// fractional part kept to nanosecond precision.
fn coerce_time(value: &Value, typ: &CqlType) -> Result<CqlTime, SerializationError> {
    let seconds = match value {
        Value::Time(t) => return Ok(*t),
        Value::Text(s) | Value::Ascii(s) => {
            let time = NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map_err(|e| malformed(typ, e))?;
            return Ok(time.into());
        }
        Value::TinyInt(v) => *v as i64,
        Value::SmallInt(v) => *v as i64,
        Value::Int(v) => *v as i64,
        Value::BigInt(v) => *v,
        Value::Float(f) => {
            return float_to_i64((*f as f64 * 1_000_000_000.0).round(), typ).map(CqlTime)
        }
        Value::Double(f) => {
            return float_to_i64((f * 1_000_000_000.0).round(), typ).map(CqlTime)
        }
        other => return Err(mismatched(typ, other)),
    };
    seconds
        .checked_mul(1_000_000_000)
        .map(CqlTime)
        .ok_or_else(|| overflow(typ))
}

/// Numbers bound into a timestamp slot are seconds since the Unix epoch,
/// fractional seconds allowed; strings accept RFC 3339 as well as the
/// space-separated canonical form, with or without a zone offset. Offsets
/// normalize to UTC.
fn coerce_timestamp_millis(value: &Value, typ: &CqlType) -> Result<i64, SerializationError> {
    match value {
        Value::Timestamp(t) => Ok(t.0),
        Value::TinyInt(v) => (*v as i64).checked_mul(1000).ok_or_else(|| overflow(typ)),
        Value::SmallInt(v) => (*v as i64).checked_mul(1000).ok_or_else(|| overflow(typ)),
        Value::Int(v) => (*v as i64).checked_mul(1000).ok_or_else(|| overflow(typ)),
        Value::BigInt(v) => v.checked_mul(1000).ok_or_else(|| overflow(typ)),
        Value::Float(f) => float_to_i64((*f as f64 * 1000.0).floor(), typ),
        Value::Double(f) => float_to_i64((f * 1000.0).floor(), typ),
        Value::Text(s) | Value::Ascii(s) => parse_timestamp_string(s, typ),
        other => Err(mismatched(typ, other)),
    }
}

/// Accepted string forms, from most to least specific: RFC 3339, then
/// offset-carrying variants with a space separator or without seconds, then
/// naive datetimes (space or `T` separator, seconds optional, taken as
/// UTC), then a bare date meaning midnight UTC.
fn parse_timestamp_string(s: &str, typ: &CqlType) -> Result<i64, SerializationError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Ok(datetime.with_timezone(&Utc).timestamp_millis());
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M%:z",
    ] {
        if let Ok(datetime) = DateTime::parse_from_str(s, format) {
            return Ok(datetime.with_timezone(&Utc).timestamp_millis());
        }
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| NaiveDateTime::from(date).and_utc().timestamp_millis())
        .map_err(|e| malformed(typ, e))
}

fn coerce_decimal(value: &Value, typ: &CqlType) -> Result<CqlDecimal, SerializationError> {
    match value {
        Value::Decimal(d) => Ok(d.clone()),
        Value::Text(s) | Value::Ascii(s) => {
            CqlDecimal::from_str(s).map_err(|e| malformed(typ, e))
        }
        Value::TinyInt(v) => Ok(CqlDecimal::from(*v as i64)),
        Value::SmallInt(v) => Ok(CqlDecimal::from(*v as i64)),
        Value::Int(v) => Ok(CqlDecimal::from(*v as i64)),
        Value::BigInt(v) => Ok(CqlDecimal::from(*v)),
        // Via the shortest decimal rendering that round-trips the float, so
        // 0.1f64 becomes 0.1 and not its full binary expansion.
        Value::Float(f) if f.is_finite() => {
            CqlDecimal::from_str(&f.to_string()).map_err(|e| malformed(typ, e))
        }
        Value::Double(f) if f.is_finite() => {
            CqlDecimal::from_str(&f.to_string()).map_err(|e| malformed(typ, e))
        }
        Value::Float(_) | Value::Double(_) => Err(overflow(typ)),
        other => Err(mismatched(typ, other)),
    }
}

fn coerce_varint(value: &Value, typ: &CqlType) -> Result<BigInt, SerializationError> {
    match value {
        Value::Varint(v) => Ok(v.into()),
        Value::TinyInt(v) => Ok(BigInt::from(*v)),
        Value::SmallInt(v) => Ok(BigInt::from(*v)),
        Value::Int(v) => Ok(BigInt::from(*v)),
        Value::BigInt(v) => Ok(BigInt::from(*v)),
        Value::Text(s) | Value::Ascii(s) => {
            BigInt::from_str(s).map_err(|e| malformed(typ, e))
        }
        other => Err(mismatched(typ, other)),
    }
}

/// Error label for the raw-statement path. Without a prepared descriptor
/// only the outer collection shape is known, so element types read `blob`.
fn untyped_shape(value: &Value) -> CqlType {
    let blob = || Box::new(CqlType::Native(NativeType::Blob));
    match value {
        Value::Set(_) => CqlType::Set(blob()),
        Value::Map(_) => CqlType::Map(blob(), blob()),
        _ => CqlType::List(blob()),
    }
}

fn serialize_untyped_into(value: &Value, buf: &mut Vec<u8>) -> Result<(), SerializationError> {
    match value {
        // Handled by the callers; unreachable here but harmless.
        Value::Null | Value::Empty => {}
        Value::Boolean(b) => buf.push(*b as u8),
        Value::Blob(bytes) => buf.extend_from_slice(bytes),
        Value::TinyInt(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::SmallInt(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Int(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::BigInt(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Counter(c) => buf.extend_from_slice(&c.0.to_be_bytes()),
        Value::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Double(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Text(s) | Value::Ascii(s) => buf.extend_from_slice(s.as_bytes()),
        Value::Uuid(u) => buf.extend_from_slice(u.as_bytes()),
        Value::Timeuuid(u) => buf.extend_from_slice(u.as_bytes()),
        Value::Inet(IpAddr::V4(v4)) => buf.extend_from_slice(&v4.octets()),
        Value::Inet(IpAddr::V6(v6)) => buf.extend_from_slice(&v6.octets()),
        Value::Date(d) => buf.extend_from_slice(&d.0.to_be_bytes()),
        Value::Time(t) => buf.extend_from_slice(&t.0.to_be_bytes()),
        Value::Timestamp(t) => buf.extend_from_slice(&t.0.to_be_bytes()),
        Value::Duration(d) => {
            vint_encode(d.months as i64, buf);
            vint_encode(d.days as i64, buf);
            vint_encode(d.nanoseconds, buf);
        }
        Value::Decimal(d) => {
            let (unscaled, scale) = d.as_signed_be_bytes_slice_and_exponent();
            buf.extend_from_slice(&scale.to_be_bytes());
            buf.extend_from_slice(unscaled);
        }
        Value::Varint(v) => buf.extend_from_slice(v.as_signed_bytes_be_slice()),
        Value::List(elems) | Value::Set(elems) => {
            write_count(elems.len(), &untyped_shape(value), buf)?;
            for elem in elems {
                write_cell(serialize_value_untyped(elem)?.as_deref(), buf);
            }
        }
        Value::Map(pairs) => {
            write_count(pairs.len(), &untyped_shape(value), buf)?;
            for (k, v) in pairs {
                write_cell(serialize_value_untyped(k)?.as_deref(), buf);
                write_cell(serialize_value_untyped(v)?.as_deref(), buf);
            }
        }
        Value::Tuple(elems) => {
            for elem in elems {
                write_cell(serialize_value_untyped(elem)?.as_deref(), buf);
            }
        }
        Value::Udt { fields, .. } => {
            for (_, value) in fields {
                write_cell(serialize_value_untyped(value)?.as_deref(), buf);
            }
        }
    }
    Ok(())
}

fn mismatched(typ: &CqlType, found: &Value) -> SerializationError {
    SerializationError::new(
        typ,
        SerializationErrorKind::MismatchedType {
            found: found.kind_name(),
        },
    )
}

fn overflow(typ: &CqlType) -> SerializationError {
    SerializationError::new(typ, SerializationErrorKind::Overflow)
}

fn malformed(typ: &CqlType, source: impl std::fmt::Display) -> SerializationError {
    SerializationError::new(
        typ,
        SerializationErrorKind::MalformedValue(source.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both the typed and the raw paths count collection elements through
    // write_count, so the wire limit applies to each.
    #[test]
    fn collection_counts_past_the_wire_limit_are_rejected() {
        let typ = CqlType::List(Box::new(CqlType::Native(NativeType::Int)));
        let mut buf = Vec::new();
        assert!(write_count(3, &typ, &mut buf).is_ok());
        let err = write_count(i32::MAX as usize + 1, &typ, &mut buf).unwrap_err();
        assert_eq!(err.kind, SerializationErrorKind::TooManyElements);
    }

    #[test]
    fn raw_path_error_labels_name_the_collection_shape() {
        assert_eq!(untyped_shape(&Value::Set(vec![])).to_string(), "set<blob>");
        assert_eq!(
            untyped_shape(&Value::Map(vec![])).to_string(),
            "map<blob, blob>"
        );
    }
}

//! Host-side representation of CQL values.
//!
//! [`Value`] is a closed sum type with one constructor per CQL type, so the
//! codec dispatch is an exhaustive match and adding a CQL type is a
//! compiler-enforced change. Scalars that have no natural host type get a
//! dedicated wrapper (`CqlDate`, `CqlTime`, `CqlTimestamp`, `CqlDuration`,
//! `CqlTimeuuid`, `CqlVarint`, `CqlDecimal`).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use num_bigint::{BigInt, Sign};
use thiserror::Error;
use uuid::Uuid;

/// Returned when a value does not fit in the requested representation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value is too large to fit in the requested representation")]
pub struct ValueOverflow;

/// The unset sentinel: "do not send this column at all".
///
/// Distinct from null; only meaningful for slots of prepared statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unset;

/// A counter column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Counter(pub i64);

/// A value that might be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaybeUnset<V> {
    #[default]
    Unset,
    Set(V),
}

/// A timeuuid (UUID v1) value.
///
/// The driver does not police the UUID variant: any UUID bound into a
/// timeuuid slot is accepted as-is, matching server behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CqlTimeuuid(Uuid);

impl CqlTimeuuid {
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl FromStr for CqlTimeuuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

impl fmt::Display for CqlTimeuuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<Uuid> for CqlTimeuuid {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CqlTimeuuid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CqlTimeuuid> for Uuid {
    fn from(value: CqlTimeuuid) -> Self {
        value.0
    }
}

/// Native CQL `varint` representation: two's-complement binary,
/// big-endian byte order.
///
/// Constructors perform no normalization, so the underlying bytes may carry
/// leading zeros; [`PartialEq`] and [`Hash`] normalize before comparing.
#[derive(Debug, Clone, Eq)]
pub struct CqlVarint(Vec<u8>);

impl CqlVarint {
    /// Creates a varint from bytes in two's-complement big-endian
    /// representation.
    pub fn from_signed_bytes_be(digits: Vec<u8>) -> Self {
        Self(digits)
    }

    pub fn from_signed_bytes_be_slice(digits: &[u8]) -> Self {
        Self(digits.to_vec())
    }

    pub fn as_signed_bytes_be_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_signed_bytes_be(self) -> Vec<u8> {
        self.0
    }

    /// Strips redundant leading bytes: leading zeros of a positive number
    /// and leading `0xff`s of a negative one, keeping one where the sign
    /// bit requires it. An all-zero (or empty) buffer normalizes to `[0]`.
    fn as_normalized_slice(&self) -> &[u8] {
        let digits = self.0.as_slice();
        let (pad, keep_one_for_sign): (u8, fn(u8) -> bool) = match digits.first() {
            None => return &[0],
            Some(0x00) => (0x00, |b| b > 0x7f),
            Some(0xff) => (0xff, |b| b <= 0x7f),
            Some(_) => return digits,
        };
        match digits.iter().position(|b| *b != pad) {
            None => &digits[digits.len() - 1..],
            Some(first_significant) => {
                if keep_one_for_sign(digits[first_significant]) {
                    &digits[first_significant - 1..]
                } else {
                    &digits[first_significant..]
                }
            }
        }
    }
}

impl PartialEq for CqlVarint {
    fn eq(&self, other: &Self) -> bool {
        self.as_normalized_slice() == other.as_normalized_slice()
    }
}

impl std::hash::Hash for CqlVarint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_normalized_slice().hash(state)
    }
}

impl From<BigInt> for CqlVarint {
    fn from(value: BigInt) -> Self {
        Self(value.to_signed_bytes_be())
    }
}

impl From<i64> for CqlVarint {
    fn from(value: i64) -> Self {
        BigInt::from(value).into()
    }
}

impl From<CqlVarint> for BigInt {
    fn from(value: CqlVarint) -> Self {
        BigInt::from_signed_bytes_be(&value.0)
    }
}

impl From<&CqlVarint> for BigInt {
    fn from(value: &CqlVarint) -> Self {
        BigInt::from_signed_bytes_be(&value.0)
    }
}

impl fmt::Display for CqlVarint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BigInt::from(self))
    }
}

/// Native CQL `decimal` representation: an unscaled [`CqlVarint`] integer
/// paired with a 32-bit scale (number of digits right of the decimal point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlDecimal {
    int_val: CqlVarint,
    scale: i32,
}

/// Returned when a string does not parse as a decimal number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed decimal string: expected optional sign, digits and at most one decimal point")]
pub struct CqlDecimalParseError;

impl CqlDecimal {
    /// Creates a decimal from an unscaled two's-complement big-endian
    /// integer and a scale.
    pub fn from_signed_be_bytes_and_exponent(bytes: Vec<u8>, scale: i32) -> Self {
        Self {
            int_val: CqlVarint::from_signed_bytes_be(bytes),
            scale,
        }
    }

    pub fn as_signed_be_bytes_slice_and_exponent(&self) -> (&[u8], i32) {
        (self.int_val.as_signed_bytes_be_slice(), self.scale)
    }

    pub fn into_signed_be_bytes_and_exponent(self) -> (Vec<u8>, i32) {
        (self.int_val.into_signed_bytes_be(), self.scale)
    }
}

impl From<i64> for CqlDecimal {
    fn from(value: i64) -> Self {
        Self {
            int_val: CqlVarint::from(value),
            scale: 0,
        }
    }
}

impl FromStr for CqlDecimal {
    type Err = CqlDecimalParseError;

    /// Accepts an optional sign, digits and at most one decimal point.
    /// Anything else (exponents included) is malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sign, digits) = match s.as_bytes().first() {
            Some(b'-') => (Sign::Minus, &s[1..]),
            Some(b'+') => (Sign::Plus, &s[1..]),
            _ => (Sign::Plus, s),
        };
        let mut unscaled = String::with_capacity(digits.len());
        let mut scale: Option<i32> = None;
        for c in digits.chars() {
            match c {
                '0'..='9' => {
                    unscaled.push(c);
                    if let Some(scale) = scale.as_mut() {
                        *scale = scale.checked_add(1).ok_or(CqlDecimalParseError)?;
                    }
                }
                '.' if scale.is_none() => scale = Some(0),
                _ => return Err(CqlDecimalParseError),
            }
        }
        if unscaled.is_empty() {
            return Err(CqlDecimalParseError);
        }
        let mut int_val = BigInt::from_str(&unscaled).map_err(|_| CqlDecimalParseError)?;
        if sign == Sign::Minus {
            int_val = -int_val;
        }
        Ok(Self {
            int_val: int_val.into(),
            scale: scale.unwrap_or(0),
        })
    }
}

impl fmt::Display for CqlDecimal {
    /// Canonical plain form without an exponent, e.g. `-3.14`, `0.001`, `42`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_val = BigInt::from(&self.int_val);
        let negative = int_val.sign() == Sign::Minus;
        let mut digits = int_val.magnitude().to_string();
        if negative {
            f.write_str("-")?;
        }
        if self.scale <= 0 {
            f.write_str(&digits)?;
            for _ in 0..-(self.scale as i64) {
                f.write_str("0")?;
            }
            return Ok(());
        }
        let scale = self.scale as usize;
        if digits.len() <= scale {
            let mut padded = String::with_capacity(scale + 2);
            padded.push_str("0.");
            for _ in 0..scale - digits.len() {
                padded.push('0');
            }
            padded.push_str(&digits);
            f.write_str(&padded)
        } else {
            digits.insert(digits.len() - scale, '.');
            f.write_str(&digits)
        }
    }
}

/// Number of days between day 0 of the CQL date type and the Unix epoch.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;

/// Native CQL date representation: an unsigned day offset such that the Unix
/// epoch sits at `2^31`. Supports a far wider range than years 1-9999, with
/// no year-zero ambiguity (proleptic Gregorian calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CqlDate(pub u32);

impl CqlDate {
    /// Builds a date from a signed number of days relative to the Unix epoch.
    pub fn from_days_since_epoch(days: i64) -> Result<Self, ValueOverflow> {
        u32::try_from(days + DATE_EPOCH_OFFSET)
            .map(Self)
            .map_err(|_| ValueOverflow)
    }

    pub fn days_since_epoch(&self) -> i64 {
        self.0 as i64 - DATE_EPOCH_OFFSET
    }

    pub fn to_naive_date(self) -> Result<NaiveDate, ValueOverflow> {
        let epoch = NaiveDate::from_yo_opt(1970, 1).unwrap();
        let duration =
            chrono::Duration::try_days(self.days_since_epoch()).ok_or(ValueOverflow)?;
        epoch.checked_add_signed(duration).ok_or(ValueOverflow)
    }

    /// Canonical `YYYY-MM-DD` form; the year is zero-padded to four digits
    /// and years outside 1-9999 carry a sign or extra digits.
    pub fn canonical(&self) -> Result<String, ValueOverflow> {
        let date = self.to_naive_date()?;
        Ok(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }
}

impl From<NaiveDate> for CqlDate {
    fn from(value: NaiveDate) -> Self {
        let epoch = NaiveDate::from_yo_opt(1970, 1).unwrap();
        let days = value.signed_duration_since(epoch).num_days();
        // NaiveDate's range is a strict subset of the CQL date range.
        Self((days + DATE_EPOCH_OFFSET) as u32)
    }
}

/// Number of nanoseconds in a day; the valid `CqlTime` range is
/// `0..NANOS_IN_DAY`.
pub const NANOS_IN_DAY: i64 = 86_400_000_000_000;

/// Native CQL time representation: nanoseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CqlTime(pub i64);

impl CqlTime {
    /// Canonical `HH:MM:SS.fffffffff` form with nine fractional digits.
    pub fn canonical(&self) -> Result<String, ValueOverflow> {
        if !(0..NANOS_IN_DAY).contains(&self.0) {
            return Err(ValueOverflow);
        }
        let h = self.0 / 3_600_000_000_000;
        let m = self.0 / 60_000_000_000 % 60;
        let s = self.0 / 1_000_000_000 % 60;
        let n = self.0 % 1_000_000_000;
        Ok(format!("{h:02}:{m:02}:{s:02}.{n:09}"))
    }
}

impl From<NaiveTime> for CqlTime {
    fn from(value: NaiveTime) -> Self {
        let nanos = (value.hour() as i64 * 3600
            + value.minute() as i64 * 60
            + value.second() as i64)
            * 1_000_000_000
            + value.nanosecond() as i64;
        Self(nanos)
    }
}

impl TryFrom<CqlTime> for NaiveTime {
    type Error = ValueOverflow;

    fn try_from(value: CqlTime) -> Result<Self, Self::Error> {
        let secs = u32::try_from(value.0 / 1_000_000_000).map_err(|_| ValueOverflow)?;
        let nanos = (value.0 % 1_000_000_000) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).ok_or(ValueOverflow)
    }
}

/// Native CQL timestamp representation: signed milliseconds since the Unix
/// epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CqlTimestamp(pub i64);

impl CqlTimestamp {
    pub fn to_datetime(self) -> Result<DateTime<Utc>, ValueOverflow> {
        match Utc.timestamp_millis_opt(self.0) {
            chrono::LocalResult::Single(datetime) => Ok(datetime),
            _ => Err(ValueOverflow),
        }
    }

    /// Canonical `YYYY-MM-DD HH:MM:SS.mmmZ` form: millisecond precision,
    /// normalized to UTC, trailing `Z`.
    pub fn canonical(&self) -> Result<String, ValueOverflow> {
        let datetime = self.to_datetime()?;
        Ok(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}Z",
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
            datetime.timestamp_subsec_millis()
        ))
    }
}

impl From<DateTime<Utc>> for CqlTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp_millis())
    }
}

/// A CQL duration value: three independent signed components.
///
/// A duration is not reducible to a fixed-length interval - a month is not a
/// fixed number of days - so the components are kept separate end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CqlDuration {
    pub months: i32,
    pub days: i32,
    pub nanoseconds: i64,
}

/// Returned when a string does not parse as a CQL duration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CqlDurationParseError {
    #[error("duration string is empty")]
    Empty,
    #[error("expected a digit at offset {0}")]
    ExpectedDigit(usize),
    #[error("unknown unit token at offset {0}")]
    UnknownUnit(usize),
    #[error("unit tokens must appear once each, in descending order (offset {0})")]
    MisplacedUnit(usize),
    #[error("duration component overflows its representation")]
    Overflow,
}

/// Duration unit tokens in the only order they may appear in.
/// Each entry: token and (months, days, nanoseconds) per unit.
const DURATION_UNITS: &[(&str, (i64, i64, i64))] = &[
    ("y", (12, 0, 0)),
    ("mo", (1, 0, 0)),
    ("w", (0, 7, 0)),
    ("d", (0, 1, 0)),
    ("h", (0, 0, 3_600_000_000_000)),
    ("m", (0, 0, 60_000_000_000)),
    ("s", (0, 0, 1_000_000_000)),
    ("ms", (0, 0, 1_000_000)),
    ("us", (0, 0, 1_000)),
    ("ns", (0, 0, 1)),
];

impl FromStr for CqlDuration {
    type Err = CqlDurationParseError;

    /// Parses the `1y2mo3d4h5m6s7ms8us9ns` grammar: case-sensitive unit
    /// tokens in strictly descending order, each at most once, with an
    /// optional leading sign applied to the whole expression. Dangling
    /// digits without a unit are malformed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use CqlDurationParseError::*;

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if body.is_empty() {
            return Err(Empty);
        }

        let bytes = body.as_bytes();
        let mut pos = 0;
        let mut next_allowed_rank = 0;
        let (mut months, mut days, mut nanos) = (0i64, 0i64, 0i64);
        while pos < bytes.len() {
            let digits_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == digits_start {
                return Err(ExpectedDigit(pos));
            }
            let count: i64 = body[digits_start..pos].parse().map_err(|_| Overflow)?;

            let unit_start = pos;
            // Longest token wins, so "ms" is never read as minutes.
            let matched = DURATION_UNITS
                .iter()
                .enumerate()
                .filter(|(_, (token, _))| body[unit_start..].starts_with(token))
                .max_by_key(|(_, (token, _))| token.len());
            let (rank, (token, (m, d, n))) = match matched {
                Some((rank, unit)) => (rank, *unit),
                None if unit_start == bytes.len() => return Err(ExpectedDigit(unit_start)),
                None => return Err(UnknownUnit(unit_start)),
            };
            if rank < next_allowed_rank {
                return Err(MisplacedUnit(unit_start));
            }
            pos += token.len();
            next_allowed_rank = rank + 1;

            months = months.checked_add(count.checked_mul(m).ok_or(Overflow)?).ok_or(Overflow)?;
            days = days.checked_add(count.checked_mul(d).ok_or(Overflow)?).ok_or(Overflow)?;
            nanos = nanos.checked_add(count.checked_mul(n).ok_or(Overflow)?).ok_or(Overflow)?;
        }

        if negative {
            months = -months;
            days = -days;
            nanos = -nanos;
        }
        Ok(CqlDuration {
            months: months.try_into().map_err(|_| Overflow)?,
            days: days.try_into().map_err(|_| Overflow)?,
            nanoseconds: nanos,
        })
    }
}

impl fmt::Display for CqlDuration {
    /// Canonical rendering: `-` when negative, then nonzero components in
    /// descending unit order (`y`, `mo`, `d`, `h`, `m`, `s`, `ms`, `us`,
    /// `ns`; weeks are folded into days). Zero renders as `0s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months == 0 && self.days == 0 && self.nanoseconds == 0 {
            return f.write_str("0s");
        }
        if self.months < 0 || self.days < 0 || self.nanoseconds < 0 {
            f.write_str("-")?;
        }
        let months = (self.months as i64).unsigned_abs();
        let days = (self.days as i64).unsigned_abs();
        let nanos = self.nanoseconds.unsigned_abs();

        let components: [(u64, &str); 9] = [
            (months / 12, "y"),
            (months % 12, "mo"),
            (days, "d"),
            (nanos / 3_600_000_000_000, "h"),
            (nanos / 60_000_000_000 % 60, "m"),
            (nanos / 1_000_000_000 % 60, "s"),
            (nanos / 1_000_000 % 1_000, "ms"),
            (nanos / 1_000 % 1_000, "us"),
            (nanos % 1_000, "ns"),
        ];
        for (count, token) in components {
            if count != 0 {
                write!(f, "{count}{token}")?;
            }
        }
        Ok(())
    }
}

/// A CQL value paired with nothing: the type descriptor lives at the slot or
/// column that the value is bound to or decoded from.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// The CQL null.
    Null,
    /// A zero-length cell of a non-string type; a legacy server artifact,
    /// distinct from null.
    Empty,
    Ascii(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Counter(Counter),
    Decimal(CqlDecimal),
    Date(CqlDate),
    Double(f64),
    Duration(CqlDuration),
    Float(f32),
    Int(i32),
    BigInt(i64),
    SmallInt(i16),
    TinyInt(i8),
    Text(String),
    Timestamp(CqlTimestamp),
    Time(CqlTime),
    Inet(IpAddr),
    Uuid(Uuid),
    Timeuuid(CqlTimeuuid),
    Varint(CqlVarint),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    Udt {
        keyspace: String,
        name: String,
        /// Field order is the caller's; the codec reorders against the UDT
        /// definition when encoding.
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// A short name of the value's own shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Empty => "empty",
            Value::Ascii(_) => "ascii",
            Value::Boolean(_) => "boolean",
            Value::Blob(_) => "blob",
            Value::Counter(_) => "counter",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Double(_) => "double",
            Value::Duration(_) => "duration",
            Value::Float(_) => "float",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::SmallInt(_) => "smallint",
            Value::TinyInt(_) => "tinyint",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::Time(_) => "time",
            Value::Inet(_) => "inet",
            Value::Uuid(_) => "uuid",
            Value::Timeuuid(_) => "timeuuid",
            Value::Varint(_) => "varint",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Udt { .. } => "udt",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<i64> {
        match self {
            Self::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_smallint(&self) -> Option<i16> {
        match self {
            Self::SmallInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_tinyint(&self) -> Option<i8> {
        match self {
            Self::TinyInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_counter(&self) -> Option<Counter> {
        match self {
            Self::Counter(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_timeuuid(&self) -> Option<CqlTimeuuid> {
        match self {
            Self::Timeuuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_inet(&self) -> Option<IpAddr> {
        match self {
            Self::Inet(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_cql_date(&self) -> Option<CqlDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_cql_time(&self) -> Option<CqlTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_cql_timestamp(&self) -> Option<CqlTimestamp> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_cql_duration(&self) -> Option<CqlDuration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_cql_decimal(&self) -> Option<&CqlDecimal> {
        match self {
            Self::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_cql_varint(&self) -> Option<&CqlVarint> {
        match self {
            Self::Varint(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[Value]> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_udt_fields(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Udt { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::Text(s) | Self::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_blob(self) -> Option<Vec<u8>> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<IpAddr> for Value {
    fn from(v: IpAddr) -> Self {
        Value::Inet(v)
    }
}

impl From<CqlDuration> for Value {
    fn from(v: CqlDuration) -> Self {
        Value::Duration(v)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn varint_normalized_comparison() {
        assert_eq!(
            CqlVarint::from_signed_bytes_be(vec![0x00, 0x01]),
            CqlVarint::from_signed_bytes_be(vec![0x01]),
        );
        assert_eq!(
            CqlVarint::from_signed_bytes_be(vec![0xff, 0xfe]),
            CqlVarint::from_signed_bytes_be(vec![0xff, 0xff, 0xfe]),
        );
        // A positive number whose MSB is set needs its leading zero.
        assert_ne!(
            CqlVarint::from_signed_bytes_be(vec![0x00, 0x80]),
            CqlVarint::from_signed_bytes_be(vec![0x80]),
        );
        assert_eq!(
            CqlVarint::from_signed_bytes_be(vec![]),
            CqlVarint::from_signed_bytes_be(vec![0x00, 0x00]),
        );
    }

    #[test]
    fn decimal_parse_and_canonical_form() {
        let pi = "3.141592653589793115997963468544185161590576171875";
        assert_eq!(CqlDecimal::from_str(pi).unwrap().to_string(), pi);
        assert_eq!(CqlDecimal::from_str("-0.001").unwrap().to_string(), "-0.001");
        assert_eq!(CqlDecimal::from_str("42").unwrap().to_string(), "42");
        assert_eq!(CqlDecimal::from_str("+1.5").unwrap().to_string(), "1.5");

        assert_matches!(CqlDecimal::from_str("bad"), Err(CqlDecimalParseError));
        assert_matches!(CqlDecimal::from_str("123.bad"), Err(CqlDecimalParseError));
        assert_matches!(CqlDecimal::from_str("1.2.3"), Err(CqlDecimalParseError));
        assert_matches!(CqlDecimal::from_str(""), Err(CqlDecimalParseError));
    }

    #[test]
    fn decimal_negative_scale_appends_zeros() {
        let d = CqlDecimal::from_signed_be_bytes_and_exponent(vec![0x07], -3);
        assert_eq!(d.to_string(), "7000");
    }

    #[test]
    fn date_roundtrips_across_chrono() {
        let date = NaiveDate::from_ymd_opt(1, 2, 28).unwrap();
        let cql: CqlDate = date.into();
        assert_eq!(cql.to_naive_date().unwrap(), date);
        assert_eq!(cql.canonical().unwrap(), "0001-02-28");

        let epoch: CqlDate = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().into();
        assert_eq!(epoch.0, 1 << 31);
    }

    #[test]
    fn time_canonical_has_nine_fractional_digits() {
        let time = CqlTime(45_299_123_456_700);
        assert_eq!(time.canonical().unwrap(), "12:34:59.123456700");
        assert_matches!(CqlTime(NANOS_IN_DAY).canonical(), Err(ValueOverflow));
        assert_matches!(CqlTime(-1).canonical(), Err(ValueOverflow));
    }

    #[test]
    fn timestamp_canonical_is_utc_with_millis() {
        assert_eq!(
            CqlTimestamp(1_671_049_801_789).canonical().unwrap(),
            "2022-12-14 20:30:01.789Z"
        );
        assert_eq!(CqlTimestamp(0).canonical().unwrap(), "1970-01-01 00:00:00.000Z");
    }

    #[test]
    fn duration_parse_descending_units() {
        assert_eq!(
            CqlDuration::from_str("1y2mo3d").unwrap(),
            CqlDuration {
                months: 14,
                days: 3,
                nanoseconds: 0
            }
        );
        assert_eq!(
            CqlDuration::from_str("-1y2mo297d544h5m10s60ms634us3ns").unwrap(),
            CqlDuration {
                months: -14,
                days: -297,
                nanoseconds: -1_958_710_060_634_003
            }
        );
        assert_eq!(
            CqlDuration::from_str("2w").unwrap(),
            CqlDuration {
                months: 0,
                days: 14,
                nanoseconds: 0
            }
        );
    }

    #[test]
    fn duration_parse_rejects_malformed() {
        use CqlDurationParseError::*;
        assert_matches!(CqlDuration::from_str(""), Err(Empty));
        assert_matches!(CqlDuration::from_str("-"), Err(Empty));
        assert_matches!(CqlDuration::from_str("bad_duration"), Err(ExpectedDigit(0)));
        // Dangling digits without a unit.
        assert_matches!(CqlDuration::from_str("1y2mo54h77"), Err(ExpectedDigit(_)));
        // Ascending unit order.
        assert_matches!(CqlDuration::from_str("3d1y"), Err(MisplacedUnit(_)));
        // Repeated unit.
        assert_matches!(CqlDuration::from_str("1y2y"), Err(MisplacedUnit(_)));
        assert_matches!(CqlDuration::from_str("1q"), Err(UnknownUnit(_)));
    }

    #[test]
    fn duration_canonical_rendering() {
        let d = CqlDuration {
            months: 14,
            days: 3,
            nanoseconds: 0,
        };
        assert_eq!(d.to_string(), "1y2mo3d");
        let negative = CqlDuration {
            months: -14,
            days: -297,
            nanoseconds: -1_958_710_060_634_003,
        };
        assert_eq!(negative.to_string(), "-1y2mo297d544h5m10s60ms634us3ns");
        let zero = CqlDuration {
            months: 0,
            days: 0,
            nanoseconds: 0,
        };
        assert_eq!(zero.to_string(), "0s");
        assert_eq!(
            CqlDuration::from_str("397d1h3m2s999ms999us")
                .unwrap()
                .to_string(),
            "397d1h3m2s999ms999us"
        );
    }
}

//! On-disk representations of scalar payloads.
//!
//! - timestamps: RFC 3339 in UTC, `Z` suffix, shortest exact fraction
//! - numbers: integral values within ±2^53 as JSON integers, others as floats
//! - geo points: `{ "latitude": f64, "longitude": f64 }`
//! - references: slash-joined document path

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::{Map, Value};
use value::{GeoPoint, Timestamp};

use crate::error::{CodecError, CodecResult, NonFiniteKind};

/// Key of the latitude member of a geo point payload.
pub const LATITUDE_KEY: &str = "latitude";
/// Key of the longitude member of a geo point payload.
pub const LONGITUDE_KEY: &str = "longitude";

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Earliest and latest years a backup timestamp can carry.
const TIMESTAMP_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Fails for instants [`format_timestamp`] cannot write as plain RFC 3339.
pub(crate) fn check_timestamp(ts: &Timestamp) -> CodecResult<()> {
    let year = ts.year();
    if TIMESTAMP_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(CodecError::TimestampOutOfRange { year })
    }
}

/// Formats a timestamp for a backup file.
#[must_use]
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a timestamp written by [`format_timestamp`] (any RFC 3339 offset is accepted).
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
        .filter(|ts| check_timestamp(ts).is_ok())
}

/// Converts a number to JSON. NaN and infinities have no JSON form.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn number_to_json(n: f64) -> CodecResult<Value> {
    if let Some(kind) = NonFiniteKind::of(n) {
        return Err(CodecError::NonFiniteNumber { kind });
    }
    let negative_zero = n == 0.0 && n.is_sign_negative();
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER && !negative_zero {
        return Ok(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or(CodecError::NonFiniteNumber {
            kind: NonFiniteKind::NaN,
        })
}

pub(crate) fn geo_point_to_json(point: &GeoPoint) -> CodecResult<Value> {
    let mut map = Map::with_capacity(2);
    map.insert(LATITUDE_KEY.to_string(), number_to_json(point.latitude())?);
    map.insert(LONGITUDE_KEY.to_string(), number_to_json(point.longitude())?);
    Ok(Value::Object(map))
}

/// Name of a JSON value's type, for diagnostics.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

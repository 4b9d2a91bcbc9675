//! Type classification of native values.

use value::{NativeValue, TypeTag};

use crate::error::{CodecError, CodecResult, NonFiniteKind};
use crate::format::check_timestamp;

/// Returns the tag a native value is backed up under.
///
/// Every variant maps to at most one tag. Non-finite numbers and values the
/// backup format has no tag for are errors, never coerced.
pub fn classify(value: &NativeValue) -> CodecResult<TypeTag> {
    // Arms follow the documented check order; the match is exhaustive so the
    // order carries no meaning beyond readability.
    match value {
        NativeValue::Boolean(_) => Ok(TypeTag::Boolean),
        NativeValue::Timestamp(ts) => check_timestamp(ts).map(|()| TypeTag::Timestamp),
        NativeValue::Number(n) => match NonFiniteKind::of(*n) {
            None => Ok(TypeTag::Number),
            Some(kind) => Err(CodecError::NonFiniteNumber { kind }),
        },
        NativeValue::Array(_) => Ok(TypeTag::Array),
        NativeValue::Object(_) => Ok(TypeTag::Object),
        NativeValue::Null => Ok(TypeTag::Null),
        NativeValue::String(_) => Ok(TypeTag::String),
        NativeValue::Reference(_) => Ok(TypeTag::Reference),
        NativeValue::GeoPoint(_) => Ok(TypeTag::GeoPoint),
        NativeValue::Bytes(_) | NativeValue::Undefined => Err(CodecError::UnsupportedType {
            kind: value.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use value::{DatabaseId, DocumentPath, DocumentRef, Fields, GeoPoint};

    #[test]
    fn every_supported_variant_has_one_tag() {
        let reference = DocumentRef::new(
            DatabaseId::default_for("p"),
            DocumentPath::parse("Col/Doc").unwrap(),
        );
        let cases = [
            (NativeValue::from("Jhon"), TypeTag::String),
            (NativeValue::from(""), TypeTag::String),
            (NativeValue::from(21), TypeTag::Number),
            (NativeValue::from(321.16), TypeTag::Number),
            (NativeValue::from(true), TypeTag::Boolean),
            (NativeValue::from(false), TypeTag::Boolean),
            (NativeValue::Null, TypeTag::Null),
            (
                NativeValue::from(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap()),
                TypeTag::Timestamp,
            ),
            (
                NativeValue::from(GeoPoint::new(-32.8417, -64.3).unwrap()),
                TypeTag::GeoPoint,
            ),
            (NativeValue::from(reference), TypeTag::Reference),
            (NativeValue::Object(Fields::new()), TypeTag::Object),
            (NativeValue::Array(Vec::new()), TypeTag::Array),
        ];
        for (value, expected) in cases {
            assert_eq!(classify(&value), Ok(expected), "classify {value:?}");
        }
    }

    #[test]
    fn non_finite_numbers_rejected() {
        for (n, kind) in [
            (f64::NAN, NonFiniteKind::NaN),
            (f64::INFINITY, NonFiniteKind::PositiveInfinity),
            (f64::NEG_INFINITY, NonFiniteKind::NegativeInfinity),
        ] {
            assert_eq!(
                classify(&NativeValue::Number(n)),
                Err(CodecError::NonFiniteNumber { kind })
            );
        }
    }

    #[test]
    fn extreme_finite_numbers_accepted() {
        for n in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, -0.0] {
            assert_eq!(classify(&NativeValue::Number(n)), Ok(TypeTag::Number));
        }
    }

    #[test]
    fn timestamps_beyond_year_9999_rejected() {
        let ts = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            classify(&NativeValue::Timestamp(ts)),
            Err(CodecError::TimestampOutOfRange { year: 10000 })
        );
    }

    #[test]
    fn bytes_are_unsupported() {
        assert_eq!(
            classify(&NativeValue::Bytes(vec![0xde, 0xad])),
            Err(CodecError::UnsupportedType { kind: "bytes" })
        );
    }
}

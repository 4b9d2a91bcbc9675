use chrono::{TimeZone, Utc};
use codec::{decode_document, encode_document, DecodeContext};
use proptest::prelude::*;
use store::MemoryStore;
use value::{DatabaseId, DocumentPath, DocumentRef, Fields, GeoPoint, NativeValue, TaggedDocument};

// 0001-01-01T00:00:00Z and 9999-12-31T23:59:59Z
const MIN_SECONDS: i64 = -62_135_596_800;
const MAX_SECONDS: i64 = 253_402_300_799;

fn database() -> DatabaseId {
    DatabaseId::default_for("prop")
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_ .-]{0,10}"
}

fn number_strategy() -> impl Strategy<Value = NativeValue> {
    prop_oneof![
        (-1_000_000i32..1_000_000).prop_map(NativeValue::from),
        any::<f64>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(NativeValue::Number),
    ]
}

fn timestamp_strategy() -> impl Strategy<Value = NativeValue> {
    (MIN_SECONDS..=MAX_SECONDS, 0u32..1_000_000_000).prop_filter_map(
        "representable",
        |(secs, nanos)| Utc.timestamp_opt(secs, nanos).single().map(NativeValue::Timestamp),
    )
}

fn geo_strategy() -> impl Strategy<Value = NativeValue> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_filter_map("in range", |(lat, lon)| {
        GeoPoint::new(lat, lon).ok().map(NativeValue::GeoPoint)
    })
}

fn reference_strategy() -> impl Strategy<Value = NativeValue> {
    prop::collection::vec(("[A-Za-z0-9]{1,8}", "[A-Za-z0-9-]{1,12}"), 1..4).prop_filter_map(
        "valid path",
        |pairs| {
            let segments = pairs.into_iter().flat_map(|(c, d)| [c, d]).collect();
            DocumentPath::from_segments(segments)
                .ok()
                .map(|path| NativeValue::Reference(DocumentRef::new(database(), path)))
        },
    )
}

fn leaf_strategy() -> impl Strategy<Value = NativeValue> {
    prop_oneof![
        any::<String>().prop_map(NativeValue::String),
        number_strategy(),
        any::<bool>().prop_map(NativeValue::Boolean),
        Just(NativeValue::Null),
        timestamp_strategy(),
        geo_strategy(),
        reference_strategy(),
    ]
}

fn value_strategy() -> impl Strategy<Value = NativeValue> {
    leaf_strategy().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(NativeValue::Array),
            prop::collection::vec((key_strategy(), inner), 0..6)
                .prop_map(|entries| NativeValue::Object(entries.into_iter().collect())),
        ]
    })
}

fn document_strategy() -> impl Strategy<Value = Fields> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_backup_restore_roundtrip(doc in document_strategy()) {
        let store = MemoryStore::new(database());
        let encoded = encode_document(&doc);
        prop_assert!(encoded.is_clean());

        let text = serde_json::to_string(&encoded.value).unwrap();
        let parsed: TaggedDocument = serde_json::from_str(&text).unwrap();
        let decoded = decode_document(&parsed, &DecodeContext::bound(&store));

        prop_assert!(decoded.is_clean());
        prop_assert_eq!(decoded.value, doc);
    }

    #[test]
    fn prop_reencode_is_stable(doc in document_strategy()) {
        let store = MemoryStore::new(database());
        let first = serde_json::to_string(&encode_document(&doc).value).unwrap();
        let parsed: TaggedDocument = serde_json::from_str(&first).unwrap();
        let decoded = decode_document(&parsed, &DecodeContext::bound(&store));
        let second = serde_json::to_string(&encode_document(&decoded.value).value).unwrap();
        prop_assert_eq!(first, second);
    }
}

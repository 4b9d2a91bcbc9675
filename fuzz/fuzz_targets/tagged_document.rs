#![no_main]

use codec::{decode_document, encode_document_with_limits, CodecLimits, DecodeContext};
use libfuzzer_sys::fuzz_target;
use store::MemoryStore;
use value::{DatabaseId, TaggedDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<TaggedDocument>(data) else {
        return;
    };
    let limits = CodecLimits::for_testing();
    let store = MemoryStore::new(DatabaseId::default_for("fuzz"));

    // Unbound decoding must never panic, whatever the tags say.
    let _ = decode_document(&doc, &DecodeContext::unbound().with_limits(limits.clone()));

    // Whatever survives a bound decode must encode again without loss.
    let decoded = decode_document(&doc, &DecodeContext::bound(&store).with_limits(limits.clone()));
    let encoded = encode_document_with_limits(&decoded.value, &limits);
    assert!(encoded.is_clean(), "{:?}", encoded.diagnostics);
});

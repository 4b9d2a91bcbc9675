#![no_main]

use codec::{resolve_reference_path, split_reference_path};
use libfuzzer_sys::fuzz_target;
use store::MemoryStore;
use value::DatabaseId;

fuzz_target!(|data: &[u8]| {
    let Ok(path) = std::str::from_utf8(data) else {
        return;
    };
    let store = MemoryStore::new(DatabaseId::default_for("fuzz"));
    if let Ok(reference) = resolve_reference_path(Some(&store), path) {
        // A resolved reference writes back to the exact path it came from.
        assert_eq!(reference.path.to_string(), path);
        assert_eq!(split_reference_path(path).len() % 2, 0);
    }
});

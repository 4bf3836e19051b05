//! Fuzz test for payload fingerprints
//!
//! Any JSON payload fingerprints without panicking, deterministically, and
//! independently of object key order.
//!
//! Run with: cargo +nightly fuzz run fingerprint_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use mosaic_core::PayloadFingerprint;
use serde_json::{Map, Value};

fn reverse_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut reversed = Map::new();
            for (key, inner) in map.iter().rev() {
                reversed.insert(key.clone(), reverse_keys(inner));
            }
            Value::Object(reversed)
        }
        Value::Array(items) => Value::Array(items.iter().map(reverse_keys).collect()),
        other => other.clone(),
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let Ok(first) = PayloadFingerprint::of(&payload) else {
        return;
    };
    let again = PayloadFingerprint::of(&payload).expect("second fingerprint of same payload");
    assert_eq!(first, again, "fingerprint is not deterministic");
    assert_eq!(first.as_str().len(), 64, "fingerprint is not hex SHA-256");

    let reordered = PayloadFingerprint::of(&reverse_keys(&payload)).expect("reordered payload");
    assert_eq!(first, reordered, "fingerprint depends on key order");
});

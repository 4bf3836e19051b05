//! Fuzz test for the field normalizer
//!
//! Feeds arbitrary bytes, parsed as JSON, through every normalizer accessor
//! and the catalog record merge. Nothing may panic.
//!
//! Run with: cargo +nightly fuzz run normalizer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use mosaic_core::{FieldNormalizer, Product};
use serde_json::Value;

const FIELDS: [&str; 5] = ["id", "name", "description", "stock", "ID"];

fuzz_target!(|data: &[u8]| {
    let Ok(record) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    for field in FIELDS {
        let _ = FieldNormalizer::lookup(&record, field);
        let _ = FieldNormalizer::string(&record, field);
        let _ = FieldNormalizer::integer(&record, field);

        if let Some(text) = FieldNormalizer::non_blank_string(&record, field) {
            assert!(!text.trim().is_empty(), "non-blank accessor returned blank text");
        }
    }

    // A merged product never carries an empty id.
    if let Some(product) = Product::from_catalog_record(&record, 0) {
        assert!(!product.id.trim().is_empty(), "merged product has a blank id");
        assert_eq!(Product::catalog_id(&record), Some(product.id));
    }
});

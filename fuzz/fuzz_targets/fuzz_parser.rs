#![no_main]
//! Fuzz target for the PHP parser.
//!
//! Parses arbitrary input. The parser must never panic, and the tree's
//! leaf tokens must reconstitute the input byte for byte.
//!
//! Run: cargo +nightly fuzz run fuzz_parser

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let file = php_cst_parser::parse_source_file(input, None);
        assert_eq!(file.reconstruct(), input);
    }
});

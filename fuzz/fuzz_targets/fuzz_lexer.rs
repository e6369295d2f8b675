#![no_main]
//! Fuzz target for the PHP lexer.
//!
//! Feeds arbitrary byte sequences to the tokenizer. The lexer must never
//! panic or loop, and its output must tile the input exactly, ending with
//! the EOF token.
//!
//! Run: cargo +nightly fuzz run fuzz_lexer

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let tokens = php_cst_lexer::tokenize(input);
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.full_start, offset);
            offset += token.length;
        }
        assert_eq!(offset, input.len());
        assert_eq!(
            tokens.last().unwrap().kind,
            php_cst_lexer::TokenKind::EndOfFileToken
        );
    }
});

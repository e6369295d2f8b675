//! Tolerant PHP lexer.
//!
//! Produces a flat, lossless token stream: whitespace, comments and even
//! unclassifiable bytes are preserved, attached to the following token as
//! leading trivia or emitted as `Unknown` tokens. Concatenating every
//! token's full text reconstitutes the source byte for byte.

mod lexer;
pub mod tables;
mod token;

pub use lexer::{tokenize, TokenStream};
pub use token::{Token, TokenCategory, TokenKind, TokenShortForm};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_tiles_source() {
        // Token + offset roundtrip across the crate surface
        let source = "<?php echo 42;";
        let tokens = tokenize(source);

        let mut offset = 0;
        let mut rebuilt = String::new();
        for token in &tokens {
            assert_eq!(token.full_start, offset);
            rebuilt.push_str(token.full_text(source));
            offset = token.end();
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_kinds_for_simple_script() {
        let source = "<?php echo 42;";
        let kinds: Vec<TokenKind> = tokenize(source).iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ScriptSectionStartTag,
                TokenKind::EchoKeyword,
                TokenKind::IntegerLiteralToken,
                TokenKind::SemicolonToken,
                TokenKind::EndOfFileToken,
            ]
        );
    }

    #[test]
    fn test_categories_default_to_normal() {
        for token in tokenize("<?php $a = 1;") {
            assert_eq!(token.category, TokenCategory::Normal);
        }
    }
}

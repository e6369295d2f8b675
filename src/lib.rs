//! php-cst - a tolerant, error-recovering PHP front end.
//!
//! This is the root integration package tying together the member crates:
//! the lossless lexer and the CST parser with its JSON serializer. The
//! `php-cst` binary in `crates/php-cst-cli` drives them from the command
//! line.

pub use php_cst_lexer::{tokenize, Token, TokenCategory, TokenKind, TokenStream};
pub use php_cst_parser::{parse_source_file, pretty_print, serialize, Node, SourceFile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_surface() {
        let source = "<?php echo 1 + 2;";
        let tokens = tokenize(source);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfFileToken);

        let file = parse_source_file(source, None);
        assert_eq!(file.reconstruct(), source);

        let value = serialize(&file);
        assert!(!pretty_print(&value).is_empty());
    }
}

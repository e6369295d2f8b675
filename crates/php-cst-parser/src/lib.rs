//! Tolerant PHP parser.
//!
//! Builds a concrete syntax tree that preserves every source byte.
//! Parsing never fails: grammar violations surface as zero-length missing
//! tokens and skipped-token nodes inside an otherwise ordinary tree, so
//! formatters and refactoring tools can round-trip arbitrary input.

pub mod node;
mod parser;
mod precedence;
pub mod serialize;

pub use node::{Node, Slot, SourceFile};
pub use parser::parse_source_file;
pub use precedence::{operator_precedence_and_associativity, Associativity};
pub use serialize::{pretty_print, serialize};

#[cfg(test)]
mod tests {
    use super::*;
    use php_cst_lexer::TokenCategory;

    #[test]
    fn test_parse_round_trips_through_public_api() {
        let source = "<?php function f($x) { return $x + 1; }";
        let file = parse_source_file(source, Some("file:///demo.php"));
        assert_eq!(file.uri.as_deref(), Some("file:///demo.php"));
        assert_eq!(file.reconstruct(), source);
    }

    #[test]
    fn test_error_detection_by_walking_tokens() {
        let file = parse_source_file("<?php if (", None);
        let has_errors = file
            .tokens()
            .iter()
            .any(|t| t.category != TokenCategory::Normal);
        assert!(has_errors);
    }

    #[test]
    fn test_serialize_is_stable_across_reparse() {
        let source = "<?php $a = [1, 2 => 3];";
        let first = serialize(&parse_source_file(source, None));
        let second = serialize(&parse_source_file(source, None));
        assert_eq!(first, second);
    }
}

//! End-to-end properties over an adversarial corpus: every input must
//! tokenize into a stream that tiles the source, parse into a tree that
//! reconstitutes it byte for byte, and serialize stably.

use php_cst::{parse_source_file, serialize, tokenize, TokenKind};

const CORPUS: &[&str] = &[
    // plain scripts
    "<?php echo \"test\";",
    "<?php $a = 1 + 2 * 3;",
    "<?php if ($a) { b(); } elseif ($c): d(); endif;",
    "<?php \"a{$b}c\";",
    "<?php class A extends B implements C, D { public const X = 1; function f(&$x): int { return $x; } }",
    "<?php @@@;",
    // html interleaving
    "",
    "no php at all",
    "<!DOCTYPE html>\n<body><?php echo 1; ?></body>",
    "a<?= $x ?>b",
    "<?php ?><?php ?>",
    // strings in every flavor
    "<?php 'a\\'b';",
    "<?php \"x $y z ${w} {$v[0]} $u->p\";",
    "<?php `cmd $arg`;",
    "<?php <<<EOT\nline $var line\nEOT;\n",
    "<?php <<<'RAW'\nno $interp\nRAW;\n",
    "<?php b\"bytes\";",
    // numbers
    "<?php 0 1 012 0x1f 0b11 1.5e-3 .5 08 0b9 0xg;",
    // malformed input
    "<?php ",
    "<?php \"never closed",
    "<?php '",
    "<?php <<<EOT\nnever closed",
    "<?php /* never closed",
    "<?php class { function ( }",
    "<?php ) ] } ;",
    "<?php $a = ;",
    "<?php function",
    "<?php \u{1}\u{2}\u{3}",
    // statements galore
    "<?php do { $i++; } while ($i < 10);",
    "<?php for ($i = 0; $i < 3; $i++): work(); endfor;",
    "<?php foreach ($xs as $k => &$v) { $v = $k; }",
    "<?php switch ($x): case 1: a(); default: b(); endswitch;",
    "<?php try { a(); } catch (E $e) { b(); } finally { c(); }",
    "<?php declare(strict_types=1);",
    "<?php namespace N { const C = 1; }",
    "<?php use A\\B, C\\{D, function e};",
    "<?php goto end; end: ;",
    "<?php global $a; static $b = 2;",
    "<?php trait T { use U; }",
    "<?php interface I { function m(); }",
    // expressions galore
    "<?php $f = static function (&$x) use ($y): ?T { return $x; };",
    "<?php new C(1, ...$args);",
    "<?php isset($a, $b) ? print 1 : exit(2);",
    "<?php yield from gen();",
    "<?php (int)$a + (bool) $b - ( string )$c;",
    "<?php list($a, , $b) = [1, 2, 3];",
    "<?php $a->b()->c[0]::$d();",
    "<?php clone $obj instanceof A;",
    "<?php include_once 'f.php' or die('no');",
];

#[test]
fn test_token_stream_tiles_every_corpus_entry() {
    for source in CORPUS {
        let tokens = tokenize(source);
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(
                token.full_start, offset,
                "token gap at {offset} in {source:?}"
            );
            assert!(token.start >= token.full_start);
            offset += token.length;
        }
        assert_eq!(offset, source.len(), "stream does not cover {source:?}");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfFileToken);
    }
}

#[test]
fn test_parse_round_trips_every_corpus_entry() {
    for source in CORPUS {
        let file = parse_source_file(source, None);
        assert_eq!(&file.reconstruct(), source, "round trip failed");
    }
}

#[test]
fn test_serialization_is_deterministic() {
    for source in CORPUS {
        let first = serialize(&parse_source_file(source, None));
        let second = serialize(&parse_source_file(source, None));
        assert_eq!(first, second, "serialization unstable for {source:?}");
    }
}

#[test]
fn test_reparse_of_reconstruction_matches() {
    for source in CORPUS {
        let first = parse_source_file(source, None);
        let second = parse_source_file(&first.reconstruct(), None);
        assert_eq!(
            serialize(&first),
            serialize(&second),
            "reparse diverged for {source:?}"
        );
    }
}

#[test]
fn test_html_bytes_stay_in_inline_html_tokens() {
    // script/html separation: text outside <?php ... ?> lands in
    // InlineHtml tokens only
    let source = "AAA<?php $x = 1; ?>BBB<?php $y; ?>CCC";
    let tokens = tokenize(source);
    for token in &tokens {
        let text = token.full_text(source);
        if text.contains("AAA") || text.contains("BBB") || text.contains("CCC") {
            assert_eq!(token.kind, TokenKind::InlineHtml);
        }
        if text.contains("$x") || text.contains("$y") {
            assert_eq!(token.kind, TokenKind::VariableName);
        }
    }
}

#[test]
fn test_parse_files_from_disk() {
    // the same properties hold when sources arrive through the
    // filesystem, as the CLI reads them
    let dir = tempfile::tempdir().unwrap();
    for (i, source) in CORPUS.iter().enumerate() {
        let path = dir.path().join(format!("case_{i}.php"));
        std::fs::write(&path, source).unwrap();
        let read_back = std::fs::read_to_string(&path).unwrap();
        let file = parse_source_file(&read_back, path.to_str());
        assert_eq!(file.reconstruct(), read_back);
    }
}

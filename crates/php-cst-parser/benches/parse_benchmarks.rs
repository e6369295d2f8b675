// Criterion benchmarks for the lexer and parser hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A medium-sized script exercising the operator scanner, template
/// strings and the statement dispatch.
fn sample_source() -> String {
    let mut source = String::from("<?php\nnamespace Bench;\n");
    for i in 0..200 {
        source.push_str(&format!(
            "function f{i}($a, $b) {{\n    $c = $a + $b * {i} ** 2;\n    return \"value: {{$c}}\";\n}}\n"
        ));
    }
    source.push_str("class C { public const X = 1; function m(): int { return self::X; } }\n");
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_source();
    c.bench_function("tokenize_medium_script", |b| {
        b.iter(|| php_cst_lexer::tokenize(black_box(&source)));
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = sample_source();
    c.bench_function("parse_medium_script", |b| {
        b.iter(|| php_cst_parser::parse_source_file(black_box(&source), None));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let source = sample_source();
    let file = php_cst_parser::parse_source_file(&source, None);
    c.bench_function("serialize_medium_tree", |b| {
        b.iter(|| php_cst_parser::serialize(black_box(&file)));
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_serialize);
criterion_main!(benches);

//! Lexer throughput benchmarks.
//!
//! Run with: `cargo bench --package milac-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use milac_lex::Lexer;
use milac_util::Handler;

fn lexer_token_count(source: &str) -> usize {
    let mut handler = Handler::new();
    let lexer = Lexer::new(source, &mut handler);
    lexer.count()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "program p; var x : integer; begin x := 1; writeln(x); end.";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("var_decl", |b| {
        b.iter(|| lexer_token_count(black_box("var x : integer;")))
    });

    group.bench_function("program_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        program fib;

        function fibonacci(n: integer): integer;
        var a, b, tmp, i: integer;
        begin
            a := 0;
            b := 1;
            for i := 1 to n do
            begin
                tmp := a + b;
                a := b;
                b := tmp;
            end;
            fibonacci := a;
        end;

        var result: integer;
        begin
            result := fibonacci(10);
            writeln(result);
        end.
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box("\"hello\"")))
    });

    group.bench_function("long_string", |b| {
        let source =
            "\"This is a longer string literal used purely for diagnostics benchmarking.\"";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("decimal", |b| {
        b.iter(|| lexer_token_count(black_box("123456")))
    });

    group.bench_function("hex", |b| b.iter(|| lexer_token_count(black_box("$DEADBEEF"))));

    group.bench_function("octal", |b| b.iter(|| lexer_token_count(black_box("&777"))));

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("x := 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("very_long_variable_name := 42;")))
    });

    group.bench_function("many_idents", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "a := 1; b := 2; c := 3; d := 4; e := 5;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);

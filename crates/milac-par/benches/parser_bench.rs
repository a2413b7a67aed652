//! Parser throughput benchmarks.
//!
//! Run with `cargo bench --package milac-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use milac_par::parse_program;
use milac_util::Handler;

fn parse(source: &str) {
    let mut handler = Handler::new();
    let program = parse_program(source, &mut handler);
    assert!(program.is_some(), "benchmark fixture failed to parse");
}

fn bench_parser_minimal(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_minimal");

    let source = "program Main; begin end.";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("empty_program", |b| b.iter(|| parse(black_box(source))));

    group.finish();
}

fn bench_parser_declarations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_declarations");

    let source = r#"
        program Declarations;
        var total: integer;
        var count: integer;
        const limit = 100;
        const step = 1;

        function square(n: integer): integer;
        begin
            exit
        end;

        procedure greet(name: integer);
        forward;

        begin
            total := 0;
            count := 0
        end.
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("vars_consts_fns", |b| b.iter(|| parse(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        program ControlFlow;
        var n: integer;
        var sum: integer;
        var i: integer;

        function classify(n: integer): integer;
        begin
            if n < 0 then
                exit
            else if n = 0 then
                exit
            else
                exit
        end;

        begin
            sum := 0;
            for i := 1 to 100 do
            begin
                if i mod 2 = 0 then
                    sum := sum + i
                else
                    sum := sum - i
            end;

            i := 100;
            while i > 0 do
            begin
                sum := sum + i;
                i := i - 1
            end
        end.
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("if_while_for", |b| b.iter(|| parse(black_box(source))));

    group.finish();
}

fn bench_parser_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_expressions");

    let source = "program Expr; var x: integer; \
        begin x := (1 + 2) * 3 - 4 div 2 mod 5 + (6 = 7) + (8 <> 9) \
        + (10 <= 11) and (12 >= 13) or not (14 < 15) end.";

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_binary_ops", |b| b.iter(|| parse(black_box(source))));

    group.finish();
}

fn bench_parser_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_calls");

    let source = r#"
        program Calls;
        var x: integer;
        var y: integer;

        begin
            readln(x);
            writeln(x);
            dec(x);
            writeln(x + y);
            writeln(x, y)
        end.
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("builtin_and_user_calls", |b| {
        b.iter(|| parse(black_box(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_minimal,
    bench_parser_declarations,
    bench_parser_control_flow,
    bench_parser_expressions,
    bench_parser_calls
);
criterion_main!(benches);

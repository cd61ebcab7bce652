use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use numeric_tower::prelude::*;

fn quiet() -> Resolver<'static> {
    Resolver::with_options(
        numeric_tower::selectors::initialize(),
        ResolverOptions { trace: false },
    )
}

// Built-in operands never reach a descriptor lookup
fn bench_builtin_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_arithmetic");
    let resolver = quiet();

    let (a, b) = (Value::Int(12345), Value::Int(678));
    group.bench_function("int_add", |bench| {
        bench.iter(|| black_box(resolver.resolve_binary(OperatorKind::Add, &a, &b).unwrap()));
    });

    let (x, y) = (Value::Float(1.5), Value::Int(3));
    group.bench_function("float_mul_int", |bench| {
        bench.iter(|| black_box(resolver.resolve_binary(OperatorKind::Multiply, &x, &y).unwrap()));
    });

    let big = Value::Int(i32::MAX);
    group.bench_function("int_overflow_to_long", |bench| {
        bench.iter(|| black_box(resolver.resolve_binary(OperatorKind::Add, &big, &big).unwrap()));
    });

    group.finish();
}

fn bench_user_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("user_dispatch");
    let resolver = quiet();
    let meters = TypeDescriptor::builder(resolver.selectors(), "Meters")
        .method(Selector::reverse(OperatorKind::Add), |this, _| {
            Ok(Outcome::Value(this.clone()))
        })
        .build();
    let m = Value::object(meters);
    let one = Value::Int(1);

    group.bench_function("int_plus_object_reverse", |bench| {
        bench.iter(|| black_box(resolver.resolve_binary(OperatorKind::Add, &one, &m).unwrap()));
    });

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison");
    let resolver = quiet();

    let (a, b) = (Value::Int(1), Value::Float(2.5));
    group.bench_function("int_lt_float", |bench| {
        bench.iter(|| black_box(resolver.compare_bool(OperatorKind::LessThan, &a, &b).unwrap()));
    });

    let (s, t) = (Value::str("alpha"), Value::str("beta"));
    group.bench_function("str_lt_str", |bench| {
        bench.iter(|| black_box(resolver.compare_bool(OperatorKind::LessThan, &s, &t).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_builtin_arithmetic,
    bench_user_dispatch,
    bench_comparison
);
criterion_main!(benches);

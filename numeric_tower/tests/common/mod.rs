//! Shared helpers for integration tests
// This helper module is consumed selectively by the integration test files.
// Keep these utilities available without forcing every helper to be referenced
// in each individual test target.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::sync::Arc;

use num_bigint::BigInt;
use numeric_tower::prelude::*;
use numeric_tower::selectors;
use once_cell::sync::Lazy;

pub fn registry() -> &'static SelectorRegistry {
    selectors::initialize()
}

/// Resolver over the global registry with tracing off.
pub fn resolver() -> Resolver<'static> {
    Resolver::with_options(registry(), ResolverOptions { trace: false })
}

pub fn binary(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Value> {
    resolver().resolve_binary(op, left, right)
}

pub fn in_place(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Value> {
    resolver().resolve_in_place(op, left, right)
}

pub fn compare(op: OperatorKind, left: &Value, right: &Value) -> bool {
    resolver()
        .compare_bool(op, left, right)
        .unwrap_or_else(|e| panic!("{} {} {} failed: {}", left, op.symbol(), right, e))
}

pub fn big(s: &str) -> Value {
    Value::BigInt(s.parse::<BigInt>().expect("valid integer literal"))
}

/// String payload of a value, for asserting on user method results.
pub fn text(v: &Value) -> String {
    match v {
        Value::Str(s) => s.to_string(),
        other => panic!("expected str, got {:?}", other),
    }
}

fn tagged(tag: &'static str) -> impl Fn(&Value, &Value) -> DispatchResult<Outcome> + Send + Sync {
    move |_, other| Ok(Outcome::Value(Value::str(&format!("{}:{}", tag, other))))
}

/// Type defining only `__radd__`.
pub fn reverse_adder() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder(registry(), "RAdder")
        .method(Selector::reverse(OperatorKind::Add), tagged("radd"))
        .build()
}

/// Type defining both `__add__` and `__radd__`.
pub fn two_way_adder() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder(registry(), "Adder")
        .method(Selector::forward(OperatorKind::Add), tagged("add"))
        .method(Selector::reverse(OperatorKind::Add), tagged("radd"))
        .build()
}

/// Type defining `__iadd__` and `__add__`.
pub fn accumulator() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder(registry(), "Accumulator")
        .method(Selector::in_place(OperatorKind::Add), tagged("iadd"))
        .method(Selector::forward(OperatorKind::Add), tagged("add"))
        .build()
}

/// Type whose methods raise.
pub fn raiser() -> Arc<TypeDescriptor> {
    let boom = |_: &Value, _: &Value| -> DispatchResult<Outcome> {
        Err(DispatchError::raised("RuntimeError: boom"))
    };
    TypeDescriptor::builder(registry(), "Raiser")
        .method(Selector::forward(OperatorKind::Add), boom)
        .method(Selector::reverse(OperatorKind::Subtract), boom)
        .method(Selector::forward(OperatorKind::LessThan), boom)
        .build()
}

/// Type with no methods at all.
pub fn plain(name: &str) -> Arc<TypeDescriptor> {
    TypeDescriptor::builder(registry(), name).build()
}

/// Proxy type with no methods of its own.
pub fn proxy(target: Value) -> Value {
    static WRAPPER: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| plain("Wrapper"));
    Value::proxy(Arc::clone(&*WRAPPER), target)
}

// ── Version: ordered through a rich comparison capability ────────────────────

struct VersionOrder;

fn version_of(v: &Value) -> Option<u32> {
    match v {
        Value::Object(obj) if obj.class().name() == "Version" => obj.state::<u32>().copied(),
        _ => None,
    }
}

impl RichCompare for VersionOrder {
    fn rich_compare(&self, op: OperatorKind, this: &Value, other: &Value) -> DispatchResult<Outcome> {
        let (Some(a), Some(b)) = (version_of(this), version_of(other)) else {
            return Ok(Outcome::NotApplicable);
        };
        let answer = match op {
            OperatorKind::LessThan => a < b,
            OperatorKind::LessEqual => a <= b,
            OperatorKind::GreaterThan => a > b,
            OperatorKind::GreaterEqual => a >= b,
            _ => return Ok(Outcome::NotApplicable),
        };
        Ok(Outcome::Value(Value::Bool(answer)))
    }
}

static VERSION: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::builder(registry(), "Version")
        .rich_compare(Arc::new(VersionOrder))
        .build()
});

pub fn version(n: u32) -> Value {
    Value::object_with_state(Arc::clone(&*VERSION), n)
}

// ── Legacy: ordered through __cmp__ only ──────────────────────────────────────

fn legacy_of(v: &Value) -> Option<i32> {
    match v {
        Value::Object(obj) if obj.class().name() == "Legacy" => obj.state::<i32>().copied(),
        _ => None,
    }
}

static LEGACY: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::builder(registry(), "Legacy")
        .three_way(|this, other| {
            let (Some(a), Some(b)) = (legacy_of(this), legacy_of(other)) else {
                return Ok(Outcome::NotApplicable);
            };
            // any number works; only its sign is read
            Ok(Outcome::Value(Value::Int((a - b) * 10)))
        })
        .build()
});

pub fn legacy(n: i32) -> Value {
    Value::object_with_state(Arc::clone(&*LEGACY), n)
}

// ── Weighted: three-way capability that also compares against ints ───────────

struct WeightOrder;

fn weight_of(v: &Value) -> Option<i64> {
    match v {
        Value::Object(obj) if obj.class().name() == "Weighted" => obj.state::<i64>().copied(),
        Value::Int(i) => Some(i64::from(*i)),
        _ => None,
    }
}

impl RichCompare for WeightOrder {
    fn three_way(&self, this: &Value, other: &Value) -> DispatchResult<Option<Ordering>> {
        Ok(match (weight_of(this), weight_of(other)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        })
    }
}

static WEIGHTED: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::builder(registry(), "Weighted")
        .rich_compare(Arc::new(WeightOrder))
        .build()
});

pub fn weighted(n: i64) -> Value {
    Value::object_with_state(Arc::clone(&*WEIGHTED), n)
}

/// Heterogeneous values for property-style comparison checks. NaN is left
/// out; it is unordered against everything.
pub fn comparison_pool() -> Vec<Value> {
    static WIDGET: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| plain("Widget"));
    static GADGET: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| plain("Gadget"));
    vec![
        Value::None,
        Value::Bool(false),
        Value::Bool(true),
        Value::Byte(7),
        Value::Int(-3),
        Value::Int(7),
        big("123456789012345678901234567890"),
        Value::Float(2.5),
        Value::Float(f64::INFINITY),
        Value::complex(1.0, 2.0),
        Value::complex(7.0, 0.0),
        Value::str(""),
        Value::str("abc"),
        Value::event("changed"),
        Value::extensible_int(7, plain("MyInt")),
        Value::object(Arc::clone(&*WIDGET)),
        Value::object(Arc::clone(&*WIDGET)),
        Value::object(Arc::clone(&*GADGET)),
        version(1),
        version(2),
        legacy(1),
        legacy(5),
        weighted(4),
    ]
}

//! Built-in operator tables
//!
//! One forward and one reverse table per built-in representation. A table
//! is a closed match over the operator kind and the other operand's
//! representation; a combination it does not cover is `NotApplicable`,
//! which lets the resolver move on to the next step.
//!
//! - `int`: bool, byte and fixed-width int
//! - `long`: arbitrary precision int
//! - `float`: double
//! - `complex`: complex double
//! - `text`: string concatenation and repetition

pub mod complex;
pub mod float;
pub mod int;
pub mod long;
pub mod text;

use crate::error::DispatchResult;
use crate::promotion::{numeric_view, Num, Rung};
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Representation, Value};

/// True when `v` has built-in tables.
pub fn has_table(v: &Value) -> bool {
    !matches!(
        v.representation(),
        Representation::None | Representation::Event | Representation::Object
    )
}

/// Forward table of `left`'s representation: `left <op> right`.
pub fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    if op.is_comparison() {
        return Ok(Outcome::NotApplicable);
    }
    match left.representation() {
        Representation::Bool
        | Representation::Byte
        | Representation::Int
        | Representation::ExtensibleInt => int::forward(op, left, right),
        Representation::BigInt => long::forward(op, left, right),
        Representation::Float | Representation::ExtensibleFloat => float::forward(op, left, right),
        Representation::Complex | Representation::ExtensibleComplex => {
            complex::forward(op, left, right)
        }
        Representation::Str => text::forward(op, left, right),
        Representation::None | Representation::Event | Representation::Object => {
            Ok(Outcome::NotApplicable)
        }
    }
}

/// Reverse table of `right`'s representation: computes `left <op> right`
/// on behalf of the right operand.
pub fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    if op.is_comparison() {
        return Ok(Outcome::NotApplicable);
    }
    match right.representation() {
        Representation::Bool
        | Representation::Byte
        | Representation::Int
        | Representation::ExtensibleInt => int::reverse(op, left, right),
        Representation::BigInt => long::reverse(op, left, right),
        Representation::Float | Representation::ExtensibleFloat => float::reverse(op, left, right),
        Representation::Complex | Representation::ExtensibleComplex => {
            complex::reverse(op, left, right)
        }
        Representation::Str => text::reverse(op, left, right),
        Representation::None | Representation::Event | Representation::Object => {
            Ok(Outcome::NotApplicable)
        }
    }
}

/// Classic division, floor division and modulo. Only the complex tables
/// define these against a complex operand.
fn is_integral_division(op: OperatorKind) -> bool {
    matches!(
        op,
        OperatorKind::Divide | OperatorKind::FloorDivide | OperatorKind::Modulo
    )
}

/// Numeric entry shared by the tables: widen both operands to the common
/// rung and compute there.
fn numeric_binary(
    op: OperatorKind,
    left: &Value,
    right: &Value,
    complex_division: bool,
) -> DispatchResult<Outcome> {
    let (Some((ra, a)), Some((rb, b))) = (numeric_view(left), numeric_view(right)) else {
        return Ok(Outcome::NotApplicable);
    };
    if !complex_division
        && (ra == Rung::Complex || rb == Rung::Complex)
        && is_integral_division(op)
    {
        return Ok(Outcome::NotApplicable);
    }
    if let (Value::Bool(x), Value::Bool(y)) = (left, right) {
        match op {
            OperatorKind::BitAnd => return Ok(Outcome::Value(Value::Bool(x & y))),
            OperatorKind::BitOr => return Ok(Outcome::Value(Value::Bool(x | y))),
            OperatorKind::BitXor => return Ok(Outcome::Value(Value::Bool(x ^ y))),
            _ => {}
        }
    }
    let out = apply(op, &a, &b)?;
    Ok(narrow_bytes(left, right, out))
}

/// Compute `a <op> b` at the narrowest rung that holds both.
pub(crate) fn apply(op: OperatorKind, a: &Num<'_>, b: &Num<'_>) -> DispatchResult<Outcome> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => int::arith(op, *x, *y),
        (Num::Complex(_), _) | (_, Num::Complex(_)) => {
            if op.is_bitwise() {
                return Ok(Outcome::NotApplicable);
            }
            complex::arith(op, a.to_complex()?, b.to_complex()?)
        }
        (Num::Float(_), _) | (_, Num::Float(_)) => {
            if op.is_bitwise() {
                return Ok(Outcome::NotApplicable);
            }
            match (a.to_float()?, b.to_float()?) {
                (Some(x), Some(y)) => float::arith(op, x, y),
                _ => Ok(Outcome::NotApplicable),
            }
        }
        _ => match (a.to_big(), b.to_big()) {
            (Some(x), Some(y)) => long::arith(op, &x, &y),
            _ => Ok(Outcome::NotApplicable),
        },
    }
}

/// Byte with byte stays a byte when the result fits.
fn narrow_bytes(left: &Value, right: &Value, out: Outcome) -> Outcome {
    match (left, right, out) {
        (Value::Byte(_), Value::Byte(_), Outcome::Value(Value::Int(v))) => match u8::try_from(v) {
            Ok(b) => Outcome::Value(Value::Byte(b)),
            Err(_) => Outcome::Value(Value::Int(v)),
        },
        (_, _, out) => out,
    }
}

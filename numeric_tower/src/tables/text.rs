//! Tables for strings: `+` concatenates, `*` repeats.

use std::sync::Arc;

use num_traits::Signed;

use crate::error::{DispatchError, DispatchResult};
use crate::promotion::{numeric_view, Num};
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Value};

pub(super) fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    let Value::Str(s) = left else {
        return Ok(Outcome::NotApplicable);
    };
    match (op, right) {
        (OperatorKind::Add, Value::Str(other)) => Ok(Outcome::Value(concat(s, other))),
        (OperatorKind::Multiply, count) => repeat(s, count),
        _ => Ok(Outcome::NotApplicable),
    }
}

/// `count * s` on behalf of the string on the right.
pub(super) fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    match (op, right) {
        (OperatorKind::Multiply, Value::Str(s)) => repeat(s, left),
        _ => Ok(Outcome::NotApplicable),
    }
}

pub(crate) fn concat(a: &str, b: &str) -> Value {
    let mut joined = String::with_capacity(a.len() + b.len());
    joined.push_str(a);
    joined.push_str(b);
    Value::Str(Arc::from(joined))
}

/// Longest string a repetition may produce, in bytes.
const MAX_REPEAT_LEN: usize = 0x7fff_ffff;

/// Repeat `s` by an integer count; non-positive counts give the empty string.
fn repeat(s: &str, count: &Value) -> DispatchResult<Outcome> {
    let n = match numeric_view(count) {
        Some((_, Num::Int(i))) => usize::try_from(i).unwrap_or(0),
        Some((_, Num::Big(b))) if b.is_negative() => 0,
        Some((_, Num::Big(b))) => usize::try_from(b).map_err(|_| index_overflow())?,
        _ => return Ok(Outcome::NotApplicable),
    };
    match s.len().checked_mul(n) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Outcome::Value(Value::Str(Arc::from(s.repeat(n))))),
        _ => Err(index_overflow()),
    }
}

fn index_overflow() -> DispatchError {
    DispatchError::overflow_error("cannot fit 'long' into an index-sized integer")
}

//! Tables for doubles
//!
//! Modulo follows the sign of the divisor and floor division is
//! `floor(x / y)`. Shifts and bitwise operators are not defined on floats.

use crate::error::{DispatchError, DispatchResult};
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Value};

pub(super) fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

pub(super) fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

/// `x <op> y` on two doubles.
pub(crate) fn arith(op: OperatorKind, x: f64, y: f64) -> DispatchResult<Outcome> {
    let v = match op {
        OperatorKind::Add => x + y,
        OperatorKind::Subtract => x - y,
        OperatorKind::Multiply => x * y,
        OperatorKind::Divide | OperatorKind::TrueDivide => {
            if y == 0.0 {
                return Err(DispatchError::zero_division("float division"));
            }
            x / y
        }
        OperatorKind::FloorDivide => {
            if y == 0.0 {
                return Err(DispatchError::zero_division("float divmod()"));
            }
            (x / y).floor()
        }
        OperatorKind::Modulo => {
            if y == 0.0 {
                return Err(DispatchError::zero_division("float modulo"));
            }
            float_mod(x, y)
        }
        OperatorKind::Power => float_pow(x, y)?,
        _ => return Ok(Outcome::NotApplicable),
    };
    Ok(Outcome::Value(Value::Float(v)))
}

/// Remainder with the sign of the divisor.
pub(crate) fn float_mod(x: f64, y: f64) -> f64 {
    let r = x % y;
    if r == 0.0 {
        0.0f64.copysign(y)
    } else if (r < 0.0) != (y < 0.0) {
        r + y
    } else {
        r
    }
}

/// `x ** y` with the domain checks of the runtime's float power.
pub(crate) fn float_pow(x: f64, y: f64) -> DispatchResult<f64> {
    if x == 0.0 && y < 0.0 {
        return Err(DispatchError::zero_division(
            "0.0 cannot be raised to a negative power",
        ));
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(DispatchError::value_error(
            "negative number cannot be raised to a fractional power",
        ));
    }
    let r = x.powf(y);
    if r.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(DispatchError::overflow_error("Numerical result out of range"));
    }
    Ok(r)
}

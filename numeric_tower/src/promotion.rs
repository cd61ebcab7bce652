//! Numeric promotion ladder
//!
//! Bool and byte widen to int, int widens to arbitrary precision, either
//! integer widens to float, and any of them widens to complex. Conversion
//! only moves up the ladder; results never demote, even when they would fit
//! a narrower rung.

// SAFETY: i32→u32 casts in pow are guarded by a non-negative check;
// shift counts are range checked before narrowing.
#![allow(clippy::cast_sign_loss)]

use std::borrow::Cow;

use num_bigint::BigInt;
use num_integer::Integer;

use crate::complex::Complex64;
use crate::error::{DispatchError, DispatchResult};
use crate::value::Value;

/// Rungs of the ladder, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rung {
    Bool,
    Byte,
    Int,
    BigInt,
    Float,
    Complex,
}

/// Borrowed numeric payload of a value, with extensible wrappers unwrapped.
#[derive(Debug, Clone)]
pub enum Num<'a> {
    Int(i32),
    Big(&'a BigInt),
    Float(f64),
    Complex(Complex64),
}

/// Numeric view of `v`, or `None` for non-numeric values.
pub fn numeric_view(v: &Value) -> Option<(Rung, Num<'_>)> {
    match v {
        Value::Bool(b) => Some((Rung::Bool, Num::Int(*b as i32))),
        Value::Byte(b) => Some((Rung::Byte, Num::Int(*b as i32))),
        Value::Int(i) => Some((Rung::Int, Num::Int(*i))),
        Value::ExtensibleInt(e) => Some((Rung::Int, Num::Int(e.value))),
        Value::BigInt(b) => Some((Rung::BigInt, Num::Big(b))),
        Value::Float(f) => Some((Rung::Float, Num::Float(*f))),
        Value::ExtensibleFloat(e) => Some((Rung::Float, Num::Float(e.value))),
        Value::Complex(c) => Some((Rung::Complex, Num::Complex(*c))),
        Value::ExtensibleComplex(e) => Some((Rung::Complex, Num::Complex(e.value))),
        _ => None,
    }
}

pub fn rung_of(v: &Value) -> Option<Rung> {
    numeric_view(v).map(|(rung, _)| rung)
}

impl<'a> Num<'a> {
    pub fn to_big(&self) -> Option<Cow<'a, BigInt>> {
        match self {
            Num::Int(i) => Some(Cow::Owned(BigInt::from(*i))),
            Num::Big(b) => Some(Cow::Borrowed(*b)),
            _ => None,
        }
    }

    /// Float payload. Arbitrary precision integers too large for a double
    /// raise OverflowError rather than becoming infinity.
    pub fn to_float(&self) -> DispatchResult<Option<f64>> {
        Ok(match self {
            Num::Int(i) => Some(*i as f64),
            Num::Big(b) => Some(Value::big_to_f64(b).ok_or_else(big_too_large)?),
            Num::Float(f) => Some(*f),
            Num::Complex(_) => None,
        })
    }

    pub fn to_complex(&self) -> DispatchResult<Complex64> {
        Ok(match self {
            Num::Complex(c) => *c,
            other => Complex64::from_real(other.to_float()?.unwrap_or(0.0)),
        })
    }
}

fn big_too_large() -> DispatchError {
    DispatchError::overflow_error("long int too large to convert to float")
}

/// Convert `v` to the given rung.
///
/// Returns `Ok(None)` when `v` is not numeric or sits above `rung`.
pub fn promote(rung: Rung, v: &Value) -> DispatchResult<Option<Value>> {
    let Some((from, num)) = numeric_view(v) else {
        return Ok(None);
    };
    if from > rung {
        return Ok(None);
    }
    let promoted = match rung {
        Rung::Bool => match num {
            Num::Int(i) => Value::Bool(i != 0),
            _ => return Ok(None),
        },
        Rung::Byte => match num {
            Num::Int(i) => Value::Byte(i as u8),
            _ => return Ok(None),
        },
        Rung::Int => match num {
            Num::Int(i) => Value::Int(i),
            _ => return Ok(None),
        },
        Rung::BigInt => match num.to_big() {
            Some(b) => Value::BigInt(b.into_owned()),
            None => return Ok(None),
        },
        Rung::Float => match num.to_float()? {
            Some(f) => Value::Float(f),
            None => return Ok(None),
        },
        Rung::Complex => Value::Complex(num.to_complex()?),
    };
    Ok(Some(promoted))
}

/// Fixed-width operations that can overflow into arbitrary precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
    Pow,
}

/// Run `op` natively on 32-bit operands; on overflow redo it on `BigInt`.
///
/// Zero divisors raise DivisionByZero. A negative exponent for `Pow` yields
/// a float.
pub fn checked_op(op: CheckedOp, a: i32, b: i32) -> DispatchResult<Value> {
    let native = match op {
        CheckedOp::Add => a.checked_add(b),
        CheckedOp::Sub => a.checked_sub(b),
        CheckedOp::Mul => a.checked_mul(b),
        CheckedOp::FloorDiv => {
            if b == 0 {
                return Err(DispatchError::zero_division("integer division or modulo by zero"));
            }
            // i32::MIN / -1 is the only overflowing quotient
            if a == i32::MIN && b == -1 {
                None
            } else {
                Some(a.div_floor(&b))
            }
        }
        CheckedOp::Mod => {
            if b == 0 {
                return Err(DispatchError::zero_division("integer division or modulo by zero"));
            }
            if b == -1 {
                Some(0)
            } else {
                Some(a.mod_floor(&b))
            }
        }
        CheckedOp::Pow => {
            if b < 0 {
                return crate::tables::float::float_pow(a as f64, b as f64).map(Value::Float);
            }
            a.checked_pow(b as u32)
        }
    };
    match native {
        Some(v) => Ok(Value::Int(v)),
        None => Ok(Value::BigInt(big_checked(op, BigInt::from(a), BigInt::from(b)))),
    }
}

/// Arbitrary precision redo of an overflowed fixed-width operation.
/// Divisors are known to be non-zero and exponents non-negative here.
fn big_checked(op: CheckedOp, a: BigInt, b: BigInt) -> BigInt {
    match op {
        CheckedOp::Add => a + b,
        CheckedOp::Sub => a - b,
        CheckedOp::Mul => a * b,
        CheckedOp::FloorDiv => a.div_floor(&b),
        CheckedOp::Mod => a.mod_floor(&b),
        CheckedOp::Pow => {
            let exp = u32::try_from(&b).unwrap_or(u32::MAX);
            a.pow(exp)
        }
    }
}

/// `a << n` on a fixed-width int. Widens to 64 bits, then to arbitrary
/// precision, as the result requires.
pub fn shift_left(a: i32, n: i32) -> DispatchResult<Value> {
    if n < 0 {
        return Err(negative_shift());
    }
    if a == 0 {
        return Ok(Value::Int(0));
    }
    if n < 32 {
        let shifted = a << n;
        if shifted >> n == a {
            return Ok(Value::Int(shifted));
        }
    }
    if n < 64 {
        let wide = i64::from(a) << n;
        if wide >> n == i64::from(a) {
            return Ok(Value::BigInt(BigInt::from(wide)));
        }
    }
    Ok(Value::BigInt(BigInt::from(a) << (n as usize)))
}

/// `a >> n` on a fixed-width int; rounds toward negative infinity.
pub fn shift_right(a: i32, n: i32) -> DispatchResult<Value> {
    if n < 0 {
        return Err(negative_shift());
    }
    if n >= 32 {
        return Ok(Value::Int(if a < 0 { -1 } else { 0 }));
    }
    Ok(Value::Int(a >> n))
}

pub(crate) fn negative_shift() -> DispatchError {
    DispatchError::value_error("negative shift count")
}

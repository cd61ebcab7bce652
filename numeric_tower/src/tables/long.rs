//! Tables for arbitrary precision ints
//!
//! Results stay on the arbitrary precision rung even when they would fit 32
//! bits.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{DispatchError, DispatchResult};
use crate::promotion::negative_shift;
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Value};

use super::float::float_pow;

/// Bits kept when true division has to scale operands down to fit a double.
const TRUE_DIVIDE_BITS: u64 = 1000;

/// Largest accepted left shift count.
const MAX_LEFT_SHIFT: u64 = 0x7fff_ffff;

pub(super) fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

pub(super) fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

fn zero_divisor() -> DispatchError {
    DispatchError::zero_division("long division or modulo by zero")
}

/// `a <op> b` on two arbitrary precision ints.
pub(crate) fn arith(op: OperatorKind, a: &BigInt, b: &BigInt) -> DispatchResult<Outcome> {
    let v = match op {
        OperatorKind::Add => a + b,
        OperatorKind::Subtract => a - b,
        OperatorKind::Multiply => a * b,
        OperatorKind::Divide | OperatorKind::FloorDivide => {
            if b.is_zero() {
                return Err(zero_divisor());
            }
            a.div_floor(b)
        }
        OperatorKind::Modulo => {
            if b.is_zero() {
                return Err(zero_divisor());
            }
            a.mod_floor(b)
        }
        OperatorKind::TrueDivide => {
            if b.is_zero() {
                return Err(zero_divisor());
            }
            return true_divide(a, b).map(|f| Outcome::Value(Value::Float(f)));
        }
        OperatorKind::Power => return power(a, b),
        OperatorKind::LeftShift => {
            if b.is_negative() {
                return Err(negative_shift());
            }
            match u64::try_from(b) {
                _ if a.is_zero() => BigInt::zero(),
                Ok(n) if n <= MAX_LEFT_SHIFT => a << n,
                _ => return Err(DispatchError::overflow_error("outrageous left shift count")),
            }
        }
        OperatorKind::RightShift => {
            if b.is_negative() {
                return Err(negative_shift());
            }
            match usize::try_from(b) {
                Ok(n) => a >> n,
                Err(_) if a.is_negative() => -BigInt::one(),
                Err(_) => BigInt::zero(),
            }
        }
        OperatorKind::BitAnd => a & b,
        OperatorKind::BitOr => a | b,
        OperatorKind::BitXor => a ^ b,
        _ => return Ok(Outcome::NotApplicable),
    };
    Ok(Outcome::Value(Value::BigInt(v)))
}

fn power(a: &BigInt, b: &BigInt) -> DispatchResult<Outcome> {
    if b.is_negative() {
        let (Some(x), Some(y)) = (Value::big_to_f64(a), Value::big_to_f64(b)) else {
            return Err(DispatchError::overflow_error(
                "long int too large to convert to float",
            ));
        };
        return float_pow(x, y).map(|f| Outcome::Value(Value::Float(f)));
    }
    let v = match u32::try_from(b) {
        Ok(exp) => a.pow(exp),
        Err(_) if a.is_zero() || a.is_one() => a.clone(),
        Err(_) if *a == -BigInt::one() => {
            if b.is_even() {
                BigInt::one()
            } else {
                -BigInt::one()
            }
        }
        Err(_) => return Err(DispatchError::value_error("number too big")),
    };
    Ok(Outcome::Value(Value::BigInt(v)))
}

/// Quotient as a double. Operands too wide for a double are scaled down by
/// the same power of two first.
fn true_divide(a: &BigInt, b: &BigInt) -> DispatchResult<f64> {
    if let (Some(x), Some(y)) = (Value::big_to_f64(a), Value::big_to_f64(b)) {
        return Ok(x / y);
    }
    let shift = a.bits().max(b.bits()).saturating_sub(TRUE_DIVIDE_BITS);
    let x = Value::big_to_f64(&(a >> shift));
    let y = Value::big_to_f64(&(b >> shift));
    match (x, y) {
        (Some(x), Some(y)) if y != 0.0 && (x / y).is_finite() => Ok(x / y),
        _ => Err(DispatchError::overflow_error(
            "long int too large to convert to float",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigInt {
        s.parse().unwrap()
    }

    fn long(op: OperatorKind, a: &str, b: &str) -> Value {
        match arith(op, &big(a), &big(b)).unwrap() {
            Outcome::Value(v) => v,
            Outcome::NotApplicable => panic!("{:?} not applicable", op),
        }
    }

    #[test]
    fn test_no_demotion() {
        assert_eq!(
            long(OperatorKind::Subtract, "4294967296", "4294967295"),
            Value::BigInt(BigInt::one())
        );
    }

    #[test]
    fn test_floor_semantics() {
        assert_eq!(long(OperatorKind::FloorDivide, "-7", "2"), Value::BigInt(big("-4")));
        assert_eq!(long(OperatorKind::Modulo, "-7", "2"), Value::BigInt(big("1")));
        assert_eq!(long(OperatorKind::Divide, "7", "2"), Value::BigInt(big("3")));
    }

    #[test]
    fn test_true_divide_huge_operands() {
        let a = (BigInt::one() << 2000usize) * 3;
        let b = BigInt::one() << 2000usize;
        let out = arith(OperatorKind::TrueDivide, &a, &b).unwrap();
        assert!(matches!(out, Outcome::Value(Value::Float(f)) if (f - 3.0).abs() < 1e-12), "{:?}", out);
    }

    #[test]
    fn test_true_divide_overflow() {
        let a = BigInt::one() << 2000usize;
        let err = arith(OperatorKind::TrueDivide, &a, &BigInt::one()).unwrap_err();
        assert!(matches!(err, DispatchError::OverflowError(_)), "{:?}", err);
    }

    #[test]
    fn test_power() {
        assert_eq!(long(OperatorKind::Power, "10", "20"), Value::BigInt(big("100000000000000000000")));
        assert_eq!(long(OperatorKind::Power, "2", "-2"), Value::Float(0.25));
        assert_eq!(long(OperatorKind::Power, "-1", "100000000001"), Value::BigInt(big("-1")));
        assert_eq!(long(OperatorKind::Power, "1", "100000000000"), Value::BigInt(big("1")));
        let err = arith(OperatorKind::Power, &big("2"), &big("100000000000")).unwrap_err();
        assert_eq!(err, DispatchError::value_error("number too big"));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(long(OperatorKind::LeftShift, "1", "70"), Value::BigInt(big("1180591620717411303424")));
        assert_eq!(long(OperatorKind::RightShift, "-5", "1"), Value::BigInt(big("-3")));
        assert_eq!(
            long(OperatorKind::RightShift, "-5", "100000000000000000000"),
            Value::BigInt(big("-1"))
        );
        let err = arith(OperatorKind::LeftShift, &big("1"), &big("-1")).unwrap_err();
        assert_eq!(err, negative_shift());
    }

    #[test]
    fn test_outrageous_left_shift() {
        let count = BigInt::one() << 40usize;
        let err = arith(OperatorKind::LeftShift, &BigInt::one(), &count).unwrap_err();
        assert_eq!(err, DispatchError::overflow_error("outrageous left shift count"));
        let out = arith(OperatorKind::LeftShift, &BigInt::zero(), &count).unwrap();
        assert!(matches!(&out, Outcome::Value(Value::BigInt(v)) if v.is_zero()), "{:?}", out);
    }

    #[test]
    fn test_zero_divisor() {
        let err = arith(OperatorKind::Modulo, &big("5"), &BigInt::zero()).unwrap_err();
        assert!(matches!(err, DispatchError::DivisionByZero(_)), "{:?}", err);
    }
}

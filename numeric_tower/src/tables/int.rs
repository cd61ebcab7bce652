//! Tables for bool, byte and fixed-width int
//!
//! Arithmetic runs natively on 32 bits and overflows into arbitrary
//! precision through [`checked_op`]. Classic division (`/`) floor-divides;
//! true division always yields a float.

use crate::error::{DispatchError, DispatchResult};
use crate::promotion::{checked_op, shift_left, shift_right, CheckedOp};
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Value};

pub(super) fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

pub(super) fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, false)
}

/// `a <op> b` on two fixed-width ints.
pub(crate) fn arith(op: OperatorKind, a: i32, b: i32) -> DispatchResult<Outcome> {
    let v = match op {
        OperatorKind::Add => checked_op(CheckedOp::Add, a, b)?,
        OperatorKind::Subtract => checked_op(CheckedOp::Sub, a, b)?,
        OperatorKind::Multiply => checked_op(CheckedOp::Mul, a, b)?,
        OperatorKind::Divide | OperatorKind::FloorDivide => checked_op(CheckedOp::FloorDiv, a, b)?,
        OperatorKind::Modulo => checked_op(CheckedOp::Mod, a, b)?,
        OperatorKind::Power => checked_op(CheckedOp::Pow, a, b)?,
        OperatorKind::TrueDivide => {
            if b == 0 {
                return Err(DispatchError::division_by_zero());
            }
            Value::Float(f64::from(a) / f64::from(b))
        }
        OperatorKind::LeftShift => shift_left(a, b)?,
        OperatorKind::RightShift => shift_right(a, b)?,
        OperatorKind::BitAnd => Value::Int(a & b),
        OperatorKind::BitOr => Value::Int(a | b),
        OperatorKind::BitXor => Value::Int(a ^ b),
        _ => return Ok(Outcome::NotApplicable),
    };
    Ok(Outcome::Value(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn int(op: OperatorKind, a: i32, b: i32) -> Value {
        match arith(op, a, b).unwrap() {
            Outcome::Value(v) => v,
            Outcome::NotApplicable => panic!("{:?} not applicable", op),
        }
    }

    #[test]
    fn test_classic_divide_floors() {
        assert_eq!(int(OperatorKind::Divide, 7, 2), Value::Int(3));
        assert_eq!(int(OperatorKind::Divide, -7, 2), Value::Int(-4));
        assert_eq!(int(OperatorKind::FloorDivide, 7, 2), Value::Int(3));
    }

    #[test]
    fn test_true_divide_yields_float() {
        assert_eq!(int(OperatorKind::TrueDivide, 7, 2), Value::Float(3.5));
        assert_eq!(int(OperatorKind::TrueDivide, 4, 2), Value::Float(2.0));
    }

    #[test]
    fn test_zero_divisors() {
        for op in [
            OperatorKind::Divide,
            OperatorKind::FloorDivide,
            OperatorKind::TrueDivide,
            OperatorKind::Modulo,
        ] {
            let err = arith(op, 1, 0).unwrap_err();
            assert!(matches!(err, DispatchError::DivisionByZero(_)), "{:?}: {:?}", op, err);
        }
    }

    #[test]
    fn test_overflow_promotes_without_demotion() {
        assert_eq!(
            int(OperatorKind::Subtract, i32::MIN, 1),
            Value::BigInt(BigInt::from(i32::MIN as i64 - 1))
        );
        // small results stay on the fixed-width rung
        assert_eq!(int(OperatorKind::Subtract, 5, 1), Value::Int(4));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(int(OperatorKind::BitAnd, 0b1100, 0b1010), Value::Int(0b1000));
        assert_eq!(int(OperatorKind::BitOr, 0b1100, 0b1010), Value::Int(0b1110));
        assert_eq!(int(OperatorKind::BitXor, 0b1100, 0b1010), Value::Int(0b0110));
        assert_eq!(int(OperatorKind::RightShift, -8, 1), Value::Int(-4));
    }

    #[test]
    fn test_comparisons_are_not_arithmetic() {
        assert!(!arith(OperatorKind::Equal, 1, 1).unwrap().is_applicable());
    }
}

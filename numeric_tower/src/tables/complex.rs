//! Tables for complex doubles
//!
//! The complex tables are the only ones that floor-divide and take the
//! modulus against a complex operand: `x // y` is `floor(Re(x / y))` with a
//! zero imaginary part, and `x % y` is `x - y * (x // y)`.

use crate::complex::Complex64;
use crate::error::{DispatchError, DispatchResult};
use crate::selectors::OperatorKind;
use crate::value::{Outcome, Value};

pub(super) fn forward(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, true)
}

pub(super) fn reverse(op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Outcome> {
    super::numeric_binary(op, left, right, true)
}

/// `a <op> b` on two complex values.
pub(crate) fn arith(op: OperatorKind, a: Complex64, b: Complex64) -> DispatchResult<Outcome> {
    let v = match op {
        OperatorKind::Add => a.add(b),
        OperatorKind::Subtract => a.sub(b),
        OperatorKind::Multiply => a.mul(b),
        OperatorKind::Divide | OperatorKind::TrueDivide => {
            if b.is_zero() {
                return Err(DispatchError::zero_division("complex division"));
            }
            a.div(b)
        }
        OperatorKind::FloorDivide => {
            if b.is_zero() {
                return Err(DispatchError::zero_division("complex divmod()"));
            }
            floor_div(a, b)
        }
        OperatorKind::Modulo => {
            if b.is_zero() {
                return Err(DispatchError::zero_division("complex remainder"));
            }
            a.sub(b.mul(floor_div(a, b)))
        }
        OperatorKind::Power => {
            if a.is_zero() && (b.re < 0.0 || b.im != 0.0) {
                return Err(DispatchError::zero_division(
                    "0.0 to a negative or complex power",
                ));
            }
            a.pow(b)
        }
        _ => return Ok(Outcome::NotApplicable),
    };
    Ok(Outcome::Value(Value::Complex(v)))
}

fn floor_div(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::from_real(a.div(b).re.floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx(op: OperatorKind, a: Complex64, b: Complex64) -> Complex64 {
        match arith(op, a, b).unwrap() {
            Outcome::Value(Value::Complex(c)) => c,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_floor_divide_drops_imaginary_part() {
        // (7+1j) / 2 = 3.5+0.5j
        let q = cx(OperatorKind::FloorDivide, Complex64::new(7.0, 1.0), Complex64::from_real(2.0));
        assert_eq!(q, Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_modulo_is_consistent_with_floor_divide() {
        let a = Complex64::new(7.0, 1.0);
        let b = Complex64::from_real(2.0);
        let r = cx(OperatorKind::Modulo, a, b);
        assert_eq!(r, Complex64::new(1.0, 1.0));
    }

    #[test]
    fn test_division_by_zero() {
        for op in [
            OperatorKind::Divide,
            OperatorKind::TrueDivide,
            OperatorKind::FloorDivide,
            OperatorKind::Modulo,
        ] {
            let err = arith(op, Complex64::new(1.0, 1.0), Complex64::new(0.0, 0.0)).unwrap_err();
            assert!(matches!(err, DispatchError::DivisionByZero(_)), "{:?}: {:?}", op, err);
        }
    }

    #[test]
    fn test_zero_to_complex_power() {
        let err = arith(OperatorKind::Power, Complex64::new(0.0, 0.0), Complex64::new(0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, DispatchError::DivisionByZero(_)), "{:?}", err);
        assert_eq!(
            cx(OperatorKind::Power, Complex64::new(0.0, 0.0), Complex64::from_real(2.0)),
            Complex64::from_real(0.0)
        );
    }

    #[test]
    fn test_shift_not_applicable() {
        let out = arith(OperatorKind::LeftShift, Complex64::from_real(1.0), Complex64::from_real(1.0))
            .unwrap();
        assert!(!out.is_applicable());
    }
}

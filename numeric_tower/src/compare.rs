//! Comparison chain
//!
//! Every pair of values is comparable. `left <op> right` is decided by the
//! first step that gives an answer:
//!
//! 1. numeric fast path (complex values are only ordered here when equal)
//! 2. `None` sorts before everything else
//! 3. strings compare ordinally by bytes
//! 4. rich comparison capability of `left`, then the opposite comparison on
//!    `right`
//! 5. three-way capability of `left`, then `right` with the sign negated
//! 6. descriptor methods: forward comparison of `left`, opposite comparison
//!    of `right`, then `__cmp__` on either side
//! 7. fallback: same type orders by identity, different types by type name
//!
//! Equality kinds (`==`, `!=`, `<>`) skip steps 4 and 5. Their opposite is
//! the same kind, so step 6 asks the right operand's own equality method.

use std::cmp::Ordering;
use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::FromPrimitive;

use crate::error::{DispatchError, DispatchResult};
use crate::promotion::{numeric_view, Num, Rung};
use crate::resolver::Resolver;
use crate::selectors::{OperatorKind, Selector};
use crate::value::{Outcome, Value};

impl<'r> Resolver<'r> {
    /// `left <op> right` as a bool value.
    pub fn compare(&self, op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Value> {
        self.compare_bool(op, left, right).map(Value::Bool)
    }

    /// `left <op> right` for a comparison kind.
    pub fn compare_bool(&self, op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<bool> {
        if !op.is_comparison() {
            return Err(DispatchError::value_error(format!(
                "'{}' is not a comparison operator",
                op.symbol()
            )));
        }

        if let Some(answer) = numeric_relation(op, left, right) {
            return Ok(answer);
        }

        if let Some(order) = builtin_order(left, right) {
            return Ok(holds(op, order));
        }

        if let Some(answer) = self.user_relation(op, left, right)? {
            return Ok(answer);
        }

        self.trace("fallback order", op, left, right);
        Ok(holds(op, fallback_order(left, right)))
    }

    /// Three-way comparison for the legacy `cmp()` builtin.
    pub fn compare_raw(&self, left: &Value, right: &Value) -> DispatchResult<Ordering> {
        if let (Some((ra, a)), Some((rb, b))) = (numeric_view(left), numeric_view(right)) {
            if ra != Rung::Complex && rb != Rung::Complex {
                if let Some(order) = numeric_order(&a, &b) {
                    return Ok(order);
                }
            } else if complex_equal(&a, &b) {
                return Ok(Ordering::Equal);
            }
        }

        if let Some(order) = builtin_order(left, right) {
            return Ok(order);
        }

        if let Some(order) = self.capability_three_way(left, right)? {
            return Ok(order);
        }
        if let Some(order) = self.cmp_method(left, right)? {
            return Ok(order);
        }
        if let Some(order) = self.cmp_method(right, left)? {
            return Ok(order.reverse());
        }

        if self.compare_bool(OperatorKind::Equal, left, right)? {
            Ok(Ordering::Equal)
        } else if self.compare_bool(OperatorKind::LessThan, left, right)? {
            Ok(Ordering::Less)
        } else if self.compare_bool(OperatorKind::GreaterThan, left, right)? {
            Ok(Ordering::Greater)
        } else {
            // unordered (NaN): keep the result antisymmetric
            Ok(fallback_order(left, right))
        }
    }

    /// Steps 4 to 6.
    fn user_relation(&self, op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Option<bool>> {
        if !op.is_equality() {
            if let Some(cap) = left.rich_compare() {
                if let Outcome::Value(v) = cap.rich_compare(op, left, right)? {
                    self.trace("rich comparison", op, left, right);
                    return Ok(Some(v.is_truthy()));
                }
            }
            if let Some(cap) = right.rich_compare() {
                if let Outcome::Value(v) = cap.rich_compare(op.opposite(), right, left)? {
                    self.trace("reflected rich comparison", op, left, right);
                    return Ok(Some(v.is_truthy()));
                }
            }
            if let Some(order) = self.capability_three_way(left, right)? {
                self.trace("three-way capability", op, left, right);
                return Ok(Some(holds(op, order)));
            }
        }

        if let Outcome::Value(v) = self.call_slot(Selector::forward(op), left, right)? {
            self.trace("comparison method", op, left, right);
            return Ok(Some(v.is_truthy()));
        }
        if let Outcome::Value(v) = self.call_slot(Selector::forward(op.opposite()), right, left)? {
            self.trace("reflected comparison method", op, left, right);
            return Ok(Some(v.is_truthy()));
        }

        if let Some(order) = self.cmp_method(left, right)? {
            self.trace("__cmp__", op, left, right);
            return Ok(Some(holds(op, order)));
        }
        if let Some(order) = self.cmp_method(right, left)? {
            self.trace("reflected __cmp__", op, left, right);
            return Ok(Some(holds(op, order.reverse())));
        }

        Ok(None)
    }

    fn capability_three_way(&self, left: &Value, right: &Value) -> DispatchResult<Option<Ordering>> {
        if let Some(cap) = left.rich_compare() {
            if let Some(order) = cap.three_way(left, right)? {
                return Ok(Some(order));
            }
        }
        if let Some(cap) = right.rich_compare() {
            if let Some(order) = cap.three_way(right, left)? {
                return Ok(Some(order.reverse()));
            }
        }
        Ok(None)
    }

    /// `this.__cmp__(other)`, read as the sign of the returned number.
    fn cmp_method(&self, this: &Value, other: &Value) -> DispatchResult<Option<Ordering>> {
        let Some(descriptor) = this.descriptor() else {
            return Ok(None);
        };
        match descriptor.invoke(self.selectors().three_way_id(), this, other)? {
            Outcome::Value(v) => Ok(v.sign()),
            Outcome::NotApplicable => Ok(None),
        }
    }
}

/// Whether `op` holds for two operands in the given order.
fn holds(op: OperatorKind, order: Ordering) -> bool {
    match op {
        OperatorKind::LessThan => order == Ordering::Less,
        OperatorKind::LessEqual => order != Ordering::Greater,
        OperatorKind::GreaterThan => order == Ordering::Greater,
        OperatorKind::GreaterEqual => order != Ordering::Less,
        OperatorKind::Equal => order == Ordering::Equal,
        OperatorKind::NotEqual | OperatorKind::LegacyCompare => order != Ordering::Equal,
        _ => false,
    }
}

/// Like [`holds`], with unordered operands (NaN) unequal to everything.
fn holds_partial(op: OperatorKind, order: Option<Ordering>) -> bool {
    match order {
        Some(order) => holds(op, order),
        None => matches!(op, OperatorKind::NotEqual | OperatorKind::LegacyCompare),
    }
}

fn numeric_relation(op: OperatorKind, left: &Value, right: &Value) -> Option<bool> {
    let (ra, a) = numeric_view(left)?;
    let (rb, b) = numeric_view(right)?;
    if ra == Rung::Complex || rb == Rung::Complex {
        // Complex values have no order; only equal pairs are answered here.
        return match (complex_equal(&a, &b), op.is_equality()) {
            (true, _) => Some(holds(op, Ordering::Equal)),
            (false, true) => Some(op != OperatorKind::Equal),
            (false, false) => None,
        };
    }
    Some(holds_partial(op, numeric_order(&a, &b)))
}

/// Exact order of two real numbers; `None` when either is NaN.
fn numeric_order(a: &Num<'_>, b: &Num<'_>) -> Option<Ordering> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Some(x.cmp(y)),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(y),
        (Num::Float(x), Num::Int(y)) => x.partial_cmp(&f64::from(*y)),
        (Num::Int(x), Num::Float(y)) => f64::from(*x).partial_cmp(y),
        (Num::Float(x), Num::Big(y)) => float_big_order(*x, y),
        (Num::Big(x), Num::Float(y)) => float_big_order(*y, x).map(Ordering::reverse),
        (Num::Complex(_), _) | (_, Num::Complex(_)) => None,
        _ => match (a.to_big(), b.to_big()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => None,
        },
    }
}

/// Compare a double against an arbitrary precision int without rounding
/// the int.
fn float_big_order(x: f64, big: &BigInt) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if x.is_infinite() {
        return Some(if x > 0.0 { Ordering::Greater } else { Ordering::Less });
    }
    let floor = x.floor();
    let whole = BigInt::from_f64(floor)?;
    match whole.cmp(big) {
        Ordering::Equal if x > floor => Some(Ordering::Greater),
        order => Some(order),
    }
}

/// Complex equality: values with a zero imaginary part equal the real
/// number with the same value.
fn complex_equal(a: &Num<'_>, b: &Num<'_>) -> bool {
    match (as_real(a), as_real(b)) {
        (Some(x), Some(y)) => numeric_order(&x, &y) == Some(Ordering::Equal),
        (None, None) => matches!((a, b), (Num::Complex(x), Num::Complex(y)) if x == y),
        _ => false,
    }
}

fn as_real<'a>(n: &Num<'a>) -> Option<Num<'a>> {
    match n {
        Num::Complex(c) if c.im == 0.0 => Some(Num::Float(c.re)),
        Num::Complex(_) => None,
        other => Some(other.clone()),
    }
}

/// Steps 2 and 3: `None` and strings.
fn builtin_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Less),
        (_, Value::None) => Some(Ordering::Greater),
        (Value::Str(a), Value::Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        _ => None,
    }
}

/// Total order of last resort.
fn fallback_order(left: &Value, right: &Value) -> Ordering {
    if left.same_type(right) {
        return left.identity_cmp(right);
    }
    left.type_name()
        .as_bytes()
        .cmp(right.type_name().as_bytes())
        .then_with(|| type_key(left).cmp(&type_key(right)))
}

/// Distinguishes different types that share a name.
fn type_key(v: &Value) -> (u8, usize) {
    let descriptor = v.descriptor().map_or(0, |d| Arc::as_ptr(d) as usize);
    (v.representation() as u8, descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverOptions;
    use crate::selectors::SelectorRegistry;

    fn check(op: OperatorKind, l: Value, r: Value) -> bool {
        let reg = SelectorRegistry::build();
        let resolver = Resolver::with_options(&reg, ResolverOptions { trace: false });
        resolver.compare_bool(op, &l, &r).unwrap()
    }

    #[test]
    fn test_numeric_fast_path_across_rungs() {
        assert!(check(OperatorKind::LessThan, Value::Int(1), Value::Float(1.5)));
        assert!(check(OperatorKind::Equal, Value::Bool(true), Value::Int(1)));
        assert!(check(OperatorKind::Equal, Value::Int(2), Value::BigInt(BigInt::from(2))));
        assert!(check(
            OperatorKind::GreaterThan,
            Value::Float(1e30),
            Value::BigInt(BigInt::from(10).pow(29))
        ));
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = f64::NAN;
        assert!(!check(OperatorKind::Equal, Value::Float(nan), Value::Float(nan)));
        assert!(check(OperatorKind::NotEqual, Value::Float(nan), Value::Float(nan)));
        assert!(!check(OperatorKind::LessThan, Value::Float(nan), Value::Int(1)));
        assert!(!check(OperatorKind::GreaterEqual, Value::Float(nan), Value::Int(1)));
    }

    #[test]
    fn test_float_big_order_is_exact() {
        let big = BigInt::from(1u64 << 53) + 1;
        assert_eq!(float_big_order(9007199254740992.0, &big), Some(Ordering::Less));
        assert_eq!(float_big_order(2.5, &BigInt::from(2)), Some(Ordering::Greater));
        assert_eq!(float_big_order(-2.5, &BigInt::from(-2)), Some(Ordering::Less));
        assert_eq!(float_big_order(f64::NEG_INFINITY, &big), Some(Ordering::Less));
    }

    #[test]
    fn test_complex_equality_only() {
        assert!(check(OperatorKind::Equal, Value::complex(2.0, 0.0), Value::Int(2)));
        assert!(check(OperatorKind::NotEqual, Value::complex(2.0, 1.0), Value::Int(2)));
        assert!(check(OperatorKind::Equal, Value::complex(2.0, 1.0), Value::complex(2.0, 1.0)));
        assert!(!check(OperatorKind::LessThan, Value::complex(2.0, 0.0), Value::Int(2)));
        assert!(check(OperatorKind::GreaterEqual, Value::complex(2.0, 0.0), Value::Int(2)));
        // ordering falls through to the value-keyed fallback
        assert!(check(OperatorKind::LessThan, Value::complex(1.0, 5.0), Value::complex(2.0, 0.0)));
        assert!(check(OperatorKind::GreaterThan, Value::complex(2.0, 0.0), Value::complex(1.0, 5.0)));
    }

    #[test]
    fn test_none_sorts_first() {
        assert!(check(OperatorKind::LessThan, Value::None, Value::Int(-1000)));
        assert!(check(OperatorKind::GreaterThan, Value::str(""), Value::None));
        assert!(check(OperatorKind::Equal, Value::None, Value::None));
    }

    #[test]
    fn test_strings_are_ordinal() {
        assert!(check(OperatorKind::LessThan, Value::str("B"), Value::str("a")));
        assert!(check(OperatorKind::LessEqual, Value::str("a"), Value::str("a")));
    }

    #[test]
    fn test_cross_type_fallback_uses_type_names() {
        // "complex" < "int" < "str"
        assert!(check(OperatorKind::LessThan, Value::complex(9.0, 9.0), Value::Int(0)));
        assert!(check(OperatorKind::LessThan, Value::Int(100), Value::str("")));
        assert!(check(OperatorKind::NotEqual, Value::Int(1), Value::str("1")));
        assert!(check(OperatorKind::LegacyCompare, Value::Int(1), Value::str("1")));
    }

    #[test]
    fn test_non_comparison_kind_is_rejected() {
        let reg = SelectorRegistry::build();
        let resolver = Resolver::with_options(&reg, ResolverOptions { trace: false });
        let err = resolver
            .compare_bool(OperatorKind::Add, &Value::Int(1), &Value::Int(2))
            .unwrap_err();
        assert!(matches!(err, DispatchError::ValueError(_)), "{:?}", err);
    }

    #[test]
    fn test_compare_raw() {
        let reg = SelectorRegistry::build();
        let resolver = Resolver::with_options(&reg, ResolverOptions { trace: false });
        let raw = |l: Value, r: Value| resolver.compare_raw(&l, &r).unwrap();
        assert_eq!(raw(Value::Int(1), Value::Int(2)), Ordering::Less);
        assert_eq!(raw(Value::str("b"), Value::str("a")), Ordering::Greater);
        assert_eq!(raw(Value::None, Value::Int(0)), Ordering::Less);
        assert_eq!(raw(Value::complex(1.0, 1.0), Value::complex(1.0, 1.0)), Ordering::Equal);
        assert_eq!(raw(Value::Int(5), Value::str("5")), Ordering::Less);
    }

    #[test]
    fn test_compare_raw_nan_is_antisymmetric() {
        let reg = SelectorRegistry::build();
        let resolver = Resolver::with_options(&reg, ResolverOptions { trace: false });
        let raw = |l: &Value, r: &Value| resolver.compare_raw(l, r).unwrap();
        let nan = Value::Float(f64::NAN);
        // "float" sorts before "int"
        assert_eq!(raw(&nan, &Value::Int(1)), Ordering::Less);
        assert_eq!(raw(&Value::Int(1), &nan), Ordering::Greater);
        assert_eq!(raw(&nan, &Value::Float(1.0)), raw(&Value::Float(1.0), &nan).reverse());
    }
}

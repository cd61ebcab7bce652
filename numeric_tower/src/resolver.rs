//! Binary operator resolution
//!
//! Resolution of `left <op> right` walks a fixed sequence of steps and stops
//! at the first one that produces a value:
//!
//! 1. the built-in forward table of `left`'s representation
//! 2. the forward method of `left`'s type descriptor
//! 3. unless both operands have the same type: the reverse method of
//!    `right`'s descriptor, then the built-in reverse table of `right`
//! 4. one proxy layer is unwrapped (left first) and resolution restarts
//!
//! A subtype of a built-in number (an extensible value) inherits its base
//! table but overrides it: on the left its forward method runs before the
//! table, and on the right of a built-in value its reverse method runs
//! before `left`'s table.
//!
//! If nothing applies the result is an unsupported-operand error. An error
//! raised by any step, including user methods, propagates unchanged.
//!
//! In-place resolution has fast paths for string `+=` and event handler
//! subscription, then tries the in-place method of `left` before falling
//! back to the forward resolution above.
//!
//! Comparisons are resolved by the comparison chain in [`crate::compare`].

use crate::error::{DispatchError, DispatchResult};
use crate::selectors::{self, OperatorKind, Selector, SelectorRegistry};
use crate::tables;
use crate::trace;
use crate::value::{Outcome, Value};

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Log the step that answered each application to stderr.
    pub trace: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            trace: trace::enabled_from_env(),
        }
    }
}

/// Operator resolver. Holds no mutable state; share freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    selectors: &'r SelectorRegistry,
    options: ResolverOptions,
}

impl Resolver<'static> {
    /// Resolver over the process-wide registry, or `None` until
    /// [`selectors::initialize`] has run.
    pub fn global() -> Option<Self> {
        selectors::global().map(Resolver::new)
    }
}

impl<'r> Resolver<'r> {
    pub fn new(selectors: &'r SelectorRegistry) -> Self {
        Self::with_options(selectors, ResolverOptions::default())
    }

    pub fn with_options(selectors: &'r SelectorRegistry, options: ResolverOptions) -> Self {
        Self { selectors, options }
    }

    pub fn selectors(&self) -> &'r SelectorRegistry {
        self.selectors
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Evaluate `left <op> right`.
    ///
    /// Comparison kinds go through the comparison chain and yield a bool.
    pub fn resolve_binary(
        &self,
        op: OperatorKind,
        left: &Value,
        right: &Value,
    ) -> DispatchResult<Value> {
        if op.is_comparison() {
            return self.compare(op, left, right);
        }
        self.binary_steps(op, left, right)
    }

    /// Evaluate `left <op>= right`.
    ///
    /// Returns the value to rebind `left` to. For mutable targets (events)
    /// this is `left` itself.
    pub fn resolve_in_place(
        &self,
        op: OperatorKind,
        left: &Value,
        right: &Value,
    ) -> DispatchResult<Value> {
        if op.is_comparison() {
            return self.compare(op, left, right);
        }

        if op == OperatorKind::Add {
            match (left, right) {
                (Value::Str(a), Value::Str(b)) => {
                    self.trace("string fast path", op, left, right);
                    return Ok(tables::text::concat(a, b));
                }
                (Value::Event(source), handler) => {
                    self.trace("event subscription", op, left, right);
                    source.subscribe(handler.clone());
                    return Ok(left.clone());
                }
                _ => {}
            }
        }

        // Built-in values have no methods; their table runs in the forward
        // resolution below.
        if let Outcome::Value(v) = self.call_slot(Selector::in_place(op), left, right)? {
            self.trace("in-place method", op, left, right);
            return Ok(v);
        }

        self.binary_steps(op, left, right)
    }

    fn binary_steps(&self, op: OperatorKind, left: &Value, right: &Value) -> DispatchResult<Value> {
        let distinct = !left.same_type(right);
        let subtype_right = distinct && is_extensible(right) && left.descriptor().is_none();

        if subtype_right {
            if let Outcome::Value(v) = self.call_slot(Selector::reverse(op), right, left)? {
                self.trace("subtype reverse method", op, left, right);
                return Ok(v);
            }
        }

        if is_extensible(left) {
            if let Outcome::Value(v) = self.call_slot(Selector::forward(op), left, right)? {
                self.trace("subtype forward method", op, left, right);
                return Ok(v);
            }
        }

        if tables::has_table(left) {
            if let Outcome::Value(v) = tables::forward(op, left, right)? {
                self.trace("forward table", op, left, right);
                return Ok(v);
            }
        }

        if !is_extensible(left) {
            if let Outcome::Value(v) = self.call_slot(Selector::forward(op), left, right)? {
                self.trace("forward method", op, left, right);
                return Ok(v);
            }
        }

        // A type's own forward method already had its chance.
        if distinct {
            if !subtype_right {
                if let Outcome::Value(v) = self.call_slot(Selector::reverse(op), right, left)? {
                    self.trace("reverse method", op, left, right);
                    return Ok(v);
                }
            }
            if tables::has_table(right) {
                if let Outcome::Value(v) = tables::reverse(op, left, right)? {
                    self.trace("reverse table", op, left, right);
                    return Ok(v);
                }
            }
        }

        if let Some(target) = left.proxy_target() {
            self.trace("unwrap left proxy", op, left, right);
            return self.binary_steps(op, target, right);
        }
        if let Some(target) = right.proxy_target() {
            self.trace("unwrap right proxy", op, left, right);
            return self.binary_steps(op, left, target);
        }

        Err(DispatchError::unsupported(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        ))
    }

    /// Call `this`'s method for `selector` with `other` as argument.
    pub(crate) fn call_slot(
        &self,
        selector: Selector,
        this: &Value,
        other: &Value,
    ) -> DispatchResult<Outcome> {
        let (Some(descriptor), Some(id)) = (this.descriptor(), self.selectors.id(selector)) else {
            return Ok(Outcome::NotApplicable);
        };
        descriptor.invoke(id, this, other)
    }

    pub(crate) fn trace(&self, step: &str, op: OperatorKind, left: &Value, right: &Value) {
        if self.options.trace {
            trace::dispatch_log(format_args!(
                "{} {} {}: {}",
                left.type_name(),
                op.symbol(),
                right.type_name(),
                step
            ));
        }
    }
}

/// A value with both a built-in table and user methods.
fn is_extensible(v: &Value) -> bool {
    v.descriptor().is_some() && tables::has_table(v)
}

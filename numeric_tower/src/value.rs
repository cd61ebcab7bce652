//! Dynamic values seen by the operator resolver
//!
//! This module provides the `Value` enum: the numeric tower (bool, byte,
//! fixed-width int, arbitrary precision int, float, complex), extensible
//! wrappers of the three numeric bases, strings, event sources and user
//! objects. Values are cheap to clone; heap payloads sit behind `Arc`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::complex::Complex64;
use crate::descriptor::{RichCompare, TypeDescriptor};

/// Dynamic value.
#[derive(Debug, Clone)]
pub enum Value {
    // ========== Numeric Tower ==========
    /// Python `None`
    None,
    /// Boolean, the narrowest integer rung
    Bool(bool),
    /// Unsigned byte
    Byte(u8),
    /// Fixed-width 32-bit integer
    Int(i32),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// 64-bit floating point
    Float(f64),
    /// Double precision complex
    Complex(Complex64),

    // ========== Extensible Numerics ==========
    /// User subclass of int
    ExtensibleInt(Arc<Extensible<i32>>),
    /// User subclass of float
    ExtensibleFloat(Arc<Extensible<f64>>),
    /// User subclass of complex
    ExtensibleComplex(Arc<Extensible<Complex64>>),

    // ========== Reference Types ==========
    /// Immutable string
    Str(Arc<str>),
    /// Event source that accepts handlers through `+=`
    Event(Arc<EventSource>),
    /// Instance of a user type, possibly a proxy
    Object(Arc<Instance>),
}

/// Next identity handed out to a user object. Never reused.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A built-in numeric value carrying a user type descriptor.
///
/// Arithmetic treats it like its wrapped value; the descriptor is consulted
/// for user-defined methods and for the type name.
#[derive(Debug)]
pub struct Extensible<T> {
    pub value: T,
    pub class: Arc<TypeDescriptor>,
    id: u64,
}

impl<T> Extensible<T> {
    pub fn new(value: T, class: Arc<TypeDescriptor>) -> Self {
        Self {
            value,
            class,
            id: next_identity(),
        }
    }

    pub fn identity(&self) -> u64 {
        self.id
    }
}

/// Instance of a user-defined type.
///
/// A proxy instance forwards operators it does not handle itself to its
/// `target`.
pub struct Instance {
    id: u64,
    class: Arc<TypeDescriptor>,
    target: Option<Value>,
    state: Option<Arc<dyn std::any::Any + Send + Sync>>,
}

impl Instance {
    pub fn class(&self) -> &Arc<TypeDescriptor> {
        &self.class
    }

    /// Stable identity, assigned from a process-wide counter at creation.
    pub fn identity(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> Option<&Value> {
        self.target.as_ref()
    }

    /// Opaque per-instance payload, for methods that need their own data.
    pub fn state<T: 'static>(&self) -> Option<&T> {
        self.state.as_ref().and_then(|s| s.downcast_ref::<T>())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Event source: `event += handler` subscribes the handler in place.
#[derive(Debug)]
pub struct EventSource {
    name: String,
    handlers: Mutex<Vec<Value>>,
}

impl EventSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self, handler: Value) {
        match self.handlers.lock() {
            Ok(mut handlers) => handlers.push(handler),
            Err(poisoned) => poisoned.into_inner().push(handler),
        }
    }

    /// Snapshot of the subscribed handlers, in subscription order.
    pub fn handlers(&self) -> Vec<Value> {
        match self.handlers.lock() {
            Ok(handlers) => handlers.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Built-in representation, independent of any user descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    None,
    Bool,
    Byte,
    Int,
    BigInt,
    Float,
    Complex,
    ExtensibleInt,
    ExtensibleFloat,
    ExtensibleComplex,
    Str,
    Event,
    Object,
}

/// Result of one dispatch step: a value, or "this step does not apply".
#[derive(Debug, Clone)]
pub enum Outcome {
    Value(Value),
    NotApplicable,
}

impl Outcome {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::NotApplicable => None,
        }
    }
}

impl From<Value> for Outcome {
    fn from(v: Value) -> Self {
        Outcome::Value(v)
    }
}

impl Value {
    // ========== Constructors ==========

    pub fn str(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }

    /// Int when the value fits 32 bits, BigInt otherwise.
    pub fn from_i64(v: i64) -> Value {
        match i32::try_from(v) {
            Ok(small) => Value::Int(small),
            Err(_) => Value::BigInt(BigInt::from(v)),
        }
    }

    pub fn complex(re: f64, im: f64) -> Value {
        Value::Complex(Complex64::new(re, im))
    }

    pub fn extensible_int(value: i32, class: Arc<TypeDescriptor>) -> Value {
        Value::ExtensibleInt(Arc::new(Extensible::new(value, class)))
    }

    pub fn extensible_float(value: f64, class: Arc<TypeDescriptor>) -> Value {
        Value::ExtensibleFloat(Arc::new(Extensible::new(value, class)))
    }

    pub fn extensible_complex(value: Complex64, class: Arc<TypeDescriptor>) -> Value {
        Value::ExtensibleComplex(Arc::new(Extensible::new(value, class)))
    }

    pub fn event(name: impl Into<String>) -> Value {
        Value::Event(Arc::new(EventSource::new(name)))
    }

    /// Fresh instance of a user type.
    pub fn object(class: Arc<TypeDescriptor>) -> Value {
        Value::Object(Arc::new(Instance {
            id: next_identity(),
            class,
            target: None,
            state: None,
        }))
    }

    /// Fresh instance carrying an opaque payload.
    pub fn object_with_state<S: std::any::Any + Send + Sync>(
        class: Arc<TypeDescriptor>,
        state: S,
    ) -> Value {
        Value::Object(Arc::new(Instance {
            id: next_identity(),
            class,
            target: None,
            state: Some(Arc::new(state)),
        }))
    }

    /// Proxy around `target`.
    pub fn proxy(class: Arc<TypeDescriptor>, target: Value) -> Value {
        Value::Object(Arc::new(Instance {
            id: next_identity(),
            class,
            target: Some(target),
            state: None,
        }))
    }

    // ========== Type Queries ==========

    pub fn representation(&self) -> Representation {
        match self {
            Value::None => Representation::None,
            Value::Bool(_) => Representation::Bool,
            Value::Byte(_) => Representation::Byte,
            Value::Int(_) => Representation::Int,
            Value::BigInt(_) => Representation::BigInt,
            Value::Float(_) => Representation::Float,
            Value::Complex(_) => Representation::Complex,
            Value::ExtensibleInt(_) => Representation::ExtensibleInt,
            Value::ExtensibleFloat(_) => Representation::ExtensibleFloat,
            Value::ExtensibleComplex(_) => Representation::ExtensibleComplex,
            Value::Str(_) => Representation::Str,
            Value::Event(_) => Representation::Event,
            Value::Object(_) => Representation::Object,
        }
    }

    /// User type descriptor, for extensible numerics and objects.
    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            Value::ExtensibleInt(e) => Some(&e.class),
            Value::ExtensibleFloat(e) => Some(&e.class),
            Value::ExtensibleComplex(e) => Some(&e.class),
            Value::Object(obj) => Some(&obj.class),
            _ => None,
        }
    }

    /// Rich comparison capability of the value's user type.
    pub fn rich_compare(&self) -> Option<&dyn RichCompare> {
        self.descriptor().and_then(|d| d.rich_compare())
    }

    /// Type name used in error messages and in the cross-type fallback order.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Int(_) => "int",
            Value::BigInt(_) => "long",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::Event(_) => "event",
            Value::ExtensibleInt(e) => e.class.name(),
            Value::ExtensibleFloat(e) => e.class.name(),
            Value::ExtensibleComplex(e) => e.class.name(),
            Value::Object(obj) => obj.class.name(),
        }
    }

    /// The wrapped value when this is a proxy.
    pub fn proxy_target(&self) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.target.as_ref(),
            _ => None,
        }
    }

    /// True when both values have exactly the same dynamic type.
    pub fn same_type(&self, other: &Value) -> bool {
        if self.representation() != other.representation() {
            return false;
        }
        match (self.descriptor(), other.descriptor()) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Truthiness of a value returned by a user comparison method.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Byte(b) => *b != 0,
            Value::Int(i) => *i != 0,
            Value::BigInt(b) => !b.is_zero(),
            Value::Float(f) => *f != 0.0,
            Value::Complex(c) => !c.is_zero(),
            Value::ExtensibleInt(e) => e.value != 0,
            Value::ExtensibleFloat(e) => e.value != 0.0,
            Value::ExtensibleComplex(e) => !e.value.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::Event(_) | Value::Object(_) => true,
        }
    }

    /// Sign of an integer or float value, as returned by `__cmp__`.
    pub fn sign(&self) -> Option<Ordering> {
        match self {
            Value::Bool(b) => Some((*b as i32).cmp(&0)),
            Value::Byte(b) => Some(b.cmp(&0)),
            Value::Int(i) => Some(i.cmp(&0)),
            Value::ExtensibleInt(e) => Some(e.value.cmp(&0)),
            Value::BigInt(b) => Some(if b.is_negative() {
                Ordering::Less
            } else if b.is_zero() {
                Ordering::Equal
            } else {
                Ordering::Greater
            }),
            Value::Float(f) => f.partial_cmp(&0.0),
            Value::ExtensibleFloat(e) => e.value.partial_cmp(&0.0),
            _ => None,
        }
    }

    /// Per-type identity order, only meaningful between values of the same
    /// type. Objects order by creation identity; primitive values order by
    /// a key derived from the value itself.
    pub fn identity_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::BigInt(a), Value::BigInt(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Complex(a), Value::Complex(b)) => {
                a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im))
            }
            (Value::Str(a), Value::Str(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Event(a), Value::Event(b)) => {
                (Arc::as_ptr(a) as usize).cmp(&(Arc::as_ptr(b) as usize))
            }
            (Value::ExtensibleInt(a), Value::ExtensibleInt(b)) => a.id.cmp(&b.id),
            (Value::ExtensibleFloat(a), Value::ExtensibleFloat(b)) => a.id.cmp(&b.id),
            (Value::ExtensibleComplex(a), Value::ExtensibleComplex(b)) => a.id.cmp(&b.id),
            (Value::Object(a), Value::Object(b)) => a.id.cmp(&b.id),
            _ => self.type_name().cmp(other.type_name()),
        }
    }

    /// BigInt payload as f64, if finite.
    pub(crate) fn big_to_f64(b: &BigInt) -> Option<f64> {
        b.to_f64().filter(|f| f.is_finite())
    }
}

impl PartialEq for Value {
    /// Structural equality for tests and containers; reference types compare
    /// by identity. Operator `==` goes through the resolver instead.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::ExtensibleInt(a), Value::ExtensibleInt(b)) => Arc::ptr_eq(a, b),
            (Value::ExtensibleFloat(a), Value::ExtensibleFloat(b)) => Arc::ptr_eq(a, b),
            (Value::ExtensibleComplex(a), Value::ExtensibleComplex(b)) => Arc::ptr_eq(a, b),
            (Value::Event(a), Value::Event(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::BigInt(b) => write!(f, "{}L", b),
            Value::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Complex(c) => write!(f, "{}", c),
            Value::ExtensibleInt(e) => write!(f, "{}", e.value),
            Value::ExtensibleFloat(e) => write!(f, "{}", e.value),
            Value::ExtensibleComplex(e) => write!(f, "{}", e.value),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Event(e) => write!(f, "<event {}>", e.name),
            Value::Object(obj) => write!(f, "<{} object #{}>", obj.class.name(), obj.id),
        }
    }
}

// ========== Conversions ==========

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::from_i64(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::str(v)
    }
}

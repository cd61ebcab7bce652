//! Numeric tower operator dispatch
//!
//! This crate resolves binary operators for a dynamically typed runtime.
//! It includes:
//!
//! - `Value` enum covering bool, byte, int, arbitrary precision int, float,
//!   complex, their user-extensible variants, strings, events and objects
//! - the numeric promotion ladder and built-in per-representation tables
//! - a selector registry giving each operator variant a stable small id
//! - user type descriptors with method slots and rich comparison
//! - the `Resolver`: forward, reverse, in-place and comparison dispatch
//!
//! # Example
//! ```
//! use numeric_tower::prelude::*;
//! use numeric_tower::selectors;
//!
//! selectors::initialize();
//! let resolver = Resolver::global().unwrap();
//! let v = resolver
//!     .resolve_binary(OperatorKind::Add, &Value::Int(i32::MAX), &Value::Int(1))
//!     .unwrap();
//! assert_eq!(v.type_name(), "long");
//! ```

#![deny(clippy::print_stderr)]

pub mod compare;
pub mod complex;
pub mod descriptor;
pub mod error;
pub mod promotion;
pub mod resolver;
pub mod selectors;
pub mod tables;
pub mod trace;
pub mod value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::complex::Complex64;
    pub use super::descriptor::{Method, RichCompare, TypeDescriptor, TypeDescriptorBuilder};
    pub use super::error::{DispatchError, DispatchResult};
    pub use super::resolver::{Resolver, ResolverOptions};
    pub use super::selectors::{OperatorKind, Selector, SelectorId, SelectorRegistry, Variant};
    pub use super::value::{EventSource, Outcome, Value};
}

pub use prelude::*;

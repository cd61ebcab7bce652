//! User type descriptors
//!
//! A `TypeDescriptor` is the dynamic type of an extensible numeric or a user
//! object: a name, a method slot per selector id, and an optional rich
//! comparison capability.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{DispatchError, DispatchResult};
use crate::selectors::{OperatorKind, Selector, SelectorId, SelectorRegistry};
use crate::value::{Outcome, Value};

/// Special method bound in a slot. Called as `method(this, other)`.
pub type Method = Arc<dyn Fn(&Value, &Value) -> DispatchResult<Outcome> + Send + Sync>;

/// Rich comparison capability.
///
/// Both hooks default to "not applicable", so implementors override only
/// what their type supports.
pub trait RichCompare: Send + Sync {
    /// Answer `this <op> other` for a comparison kind.
    fn rich_compare(
        &self,
        op: OperatorKind,
        this: &Value,
        other: &Value,
    ) -> DispatchResult<Outcome> {
        let _ = (op, this, other);
        Ok(Outcome::NotApplicable)
    }

    /// Three-way comparison of `this` against `other`.
    fn three_way(&self, this: &Value, other: &Value) -> DispatchResult<Option<Ordering>> {
        let _ = (this, other);
        Ok(None)
    }
}

/// Dynamic type of a user value.
pub struct TypeDescriptor {
    name: String,
    slots: Vec<Option<Method>>,
    rich_compare: Option<Arc<dyn RichCompare>>,
}

impl TypeDescriptor {
    pub fn builder<'r>(registry: &'r SelectorRegistry, name: impl Into<String>) -> TypeDescriptorBuilder<'r> {
        TypeDescriptorBuilder {
            registry,
            name: name.into(),
            slots: vec![None; registry.len()],
            rich_compare: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, id: SelectorId) -> Option<&Method> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn has_method(&self, id: SelectorId) -> bool {
        self.method(id).is_some()
    }

    /// Call the slot for `id`, or report NotApplicable when it is empty.
    pub fn invoke(&self, id: SelectorId, this: &Value, other: &Value) -> DispatchResult<Outcome> {
        match self.method(id) {
            Some(method) => method(this, other),
            None => Ok(Outcome::NotApplicable),
        }
    }

    pub fn rich_compare(&self) -> Option<&dyn RichCompare> {
        self.rich_compare.as_deref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("methods", &self.slots.iter().filter(|s| s.is_some()).count())
            .field("rich_compare", &self.rich_compare.is_some())
            .finish()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder<'r> {
    registry: &'r SelectorRegistry,
    name: String,
    slots: Vec<Option<Method>>,
    rich_compare: Option<Arc<dyn RichCompare>>,
}

impl<'r> TypeDescriptorBuilder<'r> {
    /// Bind a method to a selector. Selectors the registry does not know
    /// (reverse or in-place comparisons) are ignored.
    pub fn method<F>(mut self, selector: Selector, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> DispatchResult<Outcome> + Send + Sync + 'static,
    {
        if let Some(id) = self.registry.id(selector) {
            self.slots[id.index()] = Some(Arc::new(f));
        }
        self
    }

    /// Bind a method by its special name (`"__radd__"`, `"__cmp__"`, ...).
    pub fn named<F>(mut self, name: &str, f: F) -> DispatchResult<Self>
    where
        F: Fn(&Value, &Value) -> DispatchResult<Outcome> + Send + Sync + 'static,
    {
        let id = self
            .registry
            .lookup(name)
            .ok_or_else(|| DispatchError::value_error(format!("unknown special method '{}'", name)))?;
        self.slots[id.index()] = Some(Arc::new(f));
        Ok(self)
    }

    /// Bind `__cmp__`.
    pub fn three_way<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> DispatchResult<Outcome> + Send + Sync + 'static,
    {
        let id = self.registry.three_way_id();
        self.slots[id.index()] = Some(Arc::new(f));
        self
    }

    pub fn rich_compare(mut self, capability: Arc<dyn RichCompare>) -> Self {
        self.rich_compare = Some(capability);
        self
    }

    pub fn build(self) -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor {
            name: self.name,
            slots: self.slots,
            rich_compare: self.rich_compare,
        })
    }
}

impl fmt::Debug for TypeDescriptorBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptorBuilder")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

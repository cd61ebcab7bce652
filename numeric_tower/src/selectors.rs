//! Operator selector registry.
//!
//! Every operator variant (`__add__`, `__radd__`, `__iadd__`, `__lt__`, ...)
//! gets a small stable id and one interned name. Type descriptors index their
//! method slots by [`SelectorId`], so probing a type for an operator never
//! builds or compares strings on the dispatch path.
//!
//! The process-wide registry is installed by an explicit call to
//! [`initialize`] during startup. Subsequent calls return the same instance
//! and the registry is read-only afterwards, so it can be shared across
//! threads without synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// Binary operator kinds, declared in selector id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorKind {
    Add,
    Subtract,
    Power,
    Multiply,
    FloorDivide,
    /// Classic `/`: floor division on integers, true division otherwise
    Divide,
    TrueDivide,
    Modulo,
    LeftShift,
    RightShift,
    BitAnd,
    BitOr,
    BitXor,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    /// Legacy `<>`, an alias of `!=`
    LegacyCompare,
}

impl OperatorKind {
    /// Operators with forward, reverse and in-place variants.
    pub const ARITHMETIC: [OperatorKind; 13] = [
        OperatorKind::Add,
        OperatorKind::Subtract,
        OperatorKind::Power,
        OperatorKind::Multiply,
        OperatorKind::FloorDivide,
        OperatorKind::Divide,
        OperatorKind::TrueDivide,
        OperatorKind::Modulo,
        OperatorKind::LeftShift,
        OperatorKind::RightShift,
        OperatorKind::BitAnd,
        OperatorKind::BitOr,
        OperatorKind::BitXor,
    ];

    /// Comparison operators (forward variant only).
    pub const COMPARISONS: [OperatorKind; 7] = [
        OperatorKind::LessThan,
        OperatorKind::GreaterThan,
        OperatorKind::LessEqual,
        OperatorKind::GreaterEqual,
        OperatorKind::Equal,
        OperatorKind::NotEqual,
        OperatorKind::LegacyCompare,
    ];

    pub fn is_comparison(self) -> bool {
        self >= OperatorKind::LessThan
    }

    /// `==`, `!=` and `<>`: never dispatched to the right operand's reverse method.
    pub fn is_equality(self) -> bool {
        matches!(
            self,
            OperatorKind::Equal | OperatorKind::NotEqual | OperatorKind::LegacyCompare
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            OperatorKind::LeftShift
                | OperatorKind::RightShift
                | OperatorKind::BitAnd
                | OperatorKind::BitOr
                | OperatorKind::BitXor
        )
    }

    /// The comparison to apply with swapped operands. Identity outside the
    /// comparison subset.
    pub fn opposite(self) -> OperatorKind {
        match self {
            OperatorKind::LessThan => OperatorKind::GreaterThan,
            OperatorKind::GreaterThan => OperatorKind::LessThan,
            OperatorKind::LessEqual => OperatorKind::GreaterEqual,
            OperatorKind::GreaterEqual => OperatorKind::LessEqual,
            other => other,
        }
    }

    /// Source-level operator symbol, used in error messages
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Add => "+",
            OperatorKind::Subtract => "-",
            OperatorKind::Power => "**",
            OperatorKind::Multiply => "*",
            OperatorKind::FloorDivide => "//",
            OperatorKind::Divide | OperatorKind::TrueDivide => "/",
            OperatorKind::Modulo => "%",
            OperatorKind::LeftShift => "<<",
            OperatorKind::RightShift => ">>",
            OperatorKind::BitAnd => "&",
            OperatorKind::BitOr => "|",
            OperatorKind::BitXor => "^",
            OperatorKind::LessThan => "<",
            OperatorKind::GreaterThan => ">",
            OperatorKind::LessEqual => "<=",
            OperatorKind::GreaterEqual => ">=",
            OperatorKind::Equal => "==",
            OperatorKind::NotEqual => "!=",
            OperatorKind::LegacyCompare => "<>",
        }
    }

    /// Stem of the special method name (`add` in `__add__`)
    fn stem(self) -> &'static str {
        match self {
            OperatorKind::Add => "add",
            OperatorKind::Subtract => "sub",
            OperatorKind::Power => "pow",
            OperatorKind::Multiply => "mul",
            OperatorKind::FloorDivide => "floordiv",
            OperatorKind::Divide => "div",
            OperatorKind::TrueDivide => "truediv",
            OperatorKind::Modulo => "mod",
            OperatorKind::LeftShift => "lshift",
            OperatorKind::RightShift => "rshift",
            OperatorKind::BitAnd => "and",
            OperatorKind::BitOr => "or",
            OperatorKind::BitXor => "xor",
            OperatorKind::LessThan => "lt",
            OperatorKind::GreaterThan => "gt",
            OperatorKind::LessEqual => "le",
            OperatorKind::GreaterEqual => "ge",
            OperatorKind::Equal => "eq",
            OperatorKind::NotEqual => "ne",
            OperatorKind::LegacyCompare => "lg",
        }
    }
}

/// Which operand a method is looked up on, and whether it may mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Forward,
    Reverse,
    InPlace,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Forward, Variant::Reverse, Variant::InPlace];
}

/// An operator kind paired with a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    pub kind: OperatorKind,
    pub variant: Variant,
}

impl Selector {
    pub fn forward(kind: OperatorKind) -> Self {
        Self {
            kind,
            variant: Variant::Forward,
        }
    }

    pub fn reverse(kind: OperatorKind) -> Self {
        Self {
            kind,
            variant: Variant::Reverse,
        }
    }

    pub fn in_place(kind: OperatorKind) -> Self {
        Self {
            kind,
            variant: Variant::InPlace,
        }
    }

    /// Comparisons only exist in the forward variant.
    pub fn is_valid(self) -> bool {
        !self.kind.is_comparison() || self.variant == Variant::Forward
    }

    fn method_name(self) -> String {
        let stem = self.kind.stem();
        match self.variant {
            Variant::Forward => format!("__{}__", stem),
            Variant::Reverse => format!("__r{}__", stem),
            Variant::InPlace => format!("__i{}__", stem),
        }
    }
}

/// Dense id of a registered selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(u16);

impl SelectorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Name of the auxiliary three-way comparison selector.
pub const THREE_WAY_NAME: &str = "__cmp__";

const KIND_COUNT: usize = OperatorKind::ARITHMETIC.len() + OperatorKind::COMPARISONS.len();

#[derive(Debug)]
struct Entry {
    selector: Option<Selector>,
    name: Arc<str>,
}

/// Bijection between selectors and `(SelectorId, interned name)`.
#[derive(Debug)]
pub struct SelectorRegistry {
    entries: Vec<Entry>,
    by_name: HashMap<Arc<str>, SelectorId>,
    /// `kind as usize * 3 + variant as usize` -> id
    by_selector: [Option<SelectorId>; KIND_COUNT * 3],
    three_way: SelectorId,
}

impl SelectorRegistry {
    /// Build the full table. Arithmetic operators take three consecutive ids
    /// (forward, reverse, in-place), comparisons one each, and `__cmp__` the
    /// last id.
    pub fn build() -> Self {
        let mut registry = SelectorRegistry {
            entries: Vec::with_capacity(KIND_COUNT * 3),
            by_name: HashMap::new(),
            by_selector: [None; KIND_COUNT * 3],
            three_way: SelectorId(0),
        };

        for kind in OperatorKind::ARITHMETIC {
            for variant in Variant::ALL {
                registry.push(Some(Selector { kind, variant }), Selector { kind, variant }.method_name());
            }
        }
        for kind in OperatorKind::COMPARISONS {
            let selector = Selector::forward(kind);
            registry.push(Some(selector), selector.method_name());
        }
        registry.three_way = registry.push(None, THREE_WAY_NAME.to_string());
        registry
    }

    fn push(&mut self, selector: Option<Selector>, name: String) -> SelectorId {
        let id = SelectorId(self.entries.len() as u16);
        let name: Arc<str> = Arc::from(name);
        if let Some(sel) = selector {
            self.by_selector[slot_index(sel)] = Some(id);
        }
        self.by_name.insert(Arc::clone(&name), id);
        self.entries.push(Entry { selector, name });
        id
    }

    /// Number of registered selectors (operator variants plus `__cmp__`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id of a selector; `None` for reverse/in-place comparison variants.
    pub fn id(&self, selector: Selector) -> Option<SelectorId> {
        self.by_selector[slot_index(selector)]
    }

    pub fn forward_id(&self, kind: OperatorKind) -> Option<SelectorId> {
        self.id(Selector::forward(kind))
    }

    pub fn reverse_id(&self, kind: OperatorKind) -> Option<SelectorId> {
        self.id(Selector::reverse(kind))
    }

    pub fn in_place_id(&self, kind: OperatorKind) -> Option<SelectorId> {
        self.id(Selector::in_place(kind))
    }

    /// Id of `__cmp__`.
    pub fn three_way_id(&self) -> SelectorId {
        self.three_way
    }

    /// Selector for an id; `None` for `__cmp__` or an unknown id.
    pub fn selector(&self, id: SelectorId) -> Option<Selector> {
        self.entries.get(id.index()).and_then(|e| e.selector)
    }

    /// Interned name for an id.
    pub fn name(&self, id: SelectorId) -> Option<&Arc<str>> {
        self.entries.get(id.index()).map(|e| &e.name)
    }

    /// Reverse lookup from a special method name.
    pub fn lookup(&self, name: &str) -> Option<SelectorId> {
        self.by_name.get(name).copied()
    }

    /// All ids in order.
    pub fn ids(&self) -> impl Iterator<Item = SelectorId> + '_ {
        (0..self.entries.len()).map(|i| SelectorId(i as u16))
    }
}

fn slot_index(selector: Selector) -> usize {
    selector.kind as usize * 3 + selector.variant as usize
}

static GLOBAL: OnceCell<SelectorRegistry> = OnceCell::new();

/// Install the process-wide registry.
///
/// Call once during startup, before any concurrent resolution. Later calls
/// return the already installed instance.
pub fn initialize() -> &'static SelectorRegistry {
    GLOBAL.get_or_init(SelectorRegistry::build)
}

/// The process-wide registry, or `None` before [`initialize`] ran.
pub fn global() -> Option<&'static SelectorRegistry> {
    GLOBAL.get()
}

use crate::{
    globals::{Globals, Slot},
    helper::Helper,
    path::Path,
};

use serde_json::Value;
use std::sync::Arc;

/// A data value paired with the fallback storage and the path that
/// produced it.
///
/// A [`Context`] is created for the root data of a render and for every
/// value a block descends into. It is never mutated once constructed.
#[derive(Debug, Clone)]
pub struct Context<'render> {
    /// Current data value.
    ///
    /// `None` means the value is missing entirely, which is distinct from
    /// a present null: only a missing value lets a single-segment lookup
    /// fall through to [`Globals`].
    data: Option<Value>,
    /// Fallback storage shared by every context in a render.
    globals: &'render Globals,
    /// The path expression that produced this context.
    origin: String,
}

impl<'render> Context<'render> {
    /// Create a new [`Context`] holding the given data.
    pub fn new(data: Option<Value>, globals: &'render Globals) -> Self {
        Self {
            data,
            globals,
            origin: String::new(),
        }
    }

    /// Set the origin, which is the path expression that produced this
    /// [`Context`].
    pub fn with_origin<T>(mut self, origin: T) -> Self
    where
        T: Into<String>,
    {
        self.origin = origin.into();

        self
    }

    /// Return the data value of this [`Context`], if any.
    #[inline]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Return the path expression that produced this [`Context`].
    ///
    /// Empty for the root of a render.
    #[inline]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Resolve a parsed [`Path`] against this context and the given scope
    /// chain.
    ///
    /// The starting point is this context, or the chain entry `depth`
    /// links from the top when the path ascends. Segments are then
    /// applied as property lookups, stopping early once a value is
    /// missing or null. A single-segment path that comes up missing is
    /// retrieved from [`Globals`] instead.
    ///
    /// A path that ascends past the root of the chain resolves to null.
    pub fn resolve(&self, path: &Path, chain: Option<&Parents<'_, 'render>>) -> Resolved {
        let start = if path.depth == 0 {
            self.data.as_ref()
        } else {
            match chain {
                Some(parents) if path.depth <= parents.len() => {
                    parents.ancestor(path.depth).data.as_ref()
                }
                _ => return Resolved::Value(Value::Null),
            }
        };

        let mut value = start;
        for segment in &path.segments {
            match value {
                None | Some(Value::Null) => break,
                Some(current) => value = dig(current, segment),
            }
        }

        if path.segments.len() == 1 && value.is_none() {
            return match self.globals.get(&path.segments[0]) {
                Some(slot) => slot.clone().into(),
                None => Resolved::Missing,
            };
        }

        match value {
            Some(value) => Resolved::Value(value.clone()),
            None => Resolved::Missing,
        }
    }
}

/// Apply one property lookup to the given value.
///
/// Objects are indexed by key, arrays by numeric segment. Anything else
/// has no properties.
fn dig<'value>(value: &'value Value, segment: &str) -> Option<&'value Value> {
    match value {
        Value::Object(object) => object.get(segment),
        Value::Array(array) => segment.parse::<usize>().ok().and_then(|i| array.get(i)),
        _ => None,
    }
}

/// One link in the chain of enclosing scopes.
///
/// Entering a block body extends the chain with the enclosing context by
/// creating a new link that borrows the old chain, so no existing link
/// is ever modified.
#[derive(Debug, Clone, Copy)]
pub struct Parents<'chain, 'render> {
    /// Context owned by the enclosing block.
    context: &'chain Context<'render>,
    /// Remainder of the chain.
    rest: Option<&'chain Parents<'chain, 'render>>,
    /// Number of links in the chain, this one included.
    len: usize,
}

impl<'chain, 'render> Parents<'chain, 'render> {
    /// Extend the given chain with a new link holding the context.
    pub fn link(
        rest: Option<&'chain Parents<'chain, 'render>>,
        context: &'chain Context<'render>,
    ) -> Self {
        Self {
            context,
            rest,
            len: rest.map_or(1, |parents| parents.len + 1),
        }
    }

    /// Return the number of links in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return the context `hops` links from the top of the chain, where
    /// 1 is the most recently linked context.
    ///
    /// # Panics
    ///
    /// Panics when `hops` is zero or greater than the chain length.
    pub fn ancestor(&self, hops: usize) -> &'chain Context<'render> {
        match hops {
            0 => panic!("chain is indexed from 1"),
            1 => self.context,
            _ => self
                .rest
                .expect("chain must be long enough to climb")
                .ancestor(hops - 1),
        }
    }
}

/// The outcome of resolving a path expression.
pub enum Resolved {
    /// Nothing exists at the path.
    Missing,
    /// A plain data value. May be null.
    Value(Value),
    /// Pre-escaped text from [`Globals`].
    Safe(String),
    /// A callable from [`Globals`].
    Helper(Arc<dyn Helper>),
}

impl Resolved {
    /// Return true if this value is empty.
    ///
    /// Missing values, null, false, and empty arrays are empty.
    /// Everything else, including the empty string and zero, is not.
    pub fn is_empty(&self) -> bool {
        match self {
            Resolved::Missing => true,
            Resolved::Value(value) => is_empty(value),
            Resolved::Safe(_) | Resolved::Helper(_) => false,
        }
    }

    /// Convert into plain data.
    ///
    /// Pre-escaped text becomes a string value. Missing values and
    /// helpers carry no data.
    pub fn into_data(self) -> Option<Value> {
        match self {
            Resolved::Missing | Resolved::Helper(_) => None,
            Resolved::Value(value) => Some(value),
            Resolved::Safe(text) => Some(Value::String(text)),
        }
    }
}

impl From<Slot> for Resolved {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Value(value) => Resolved::Value(value),
            Slot::Safe(text) => Resolved::Safe(text),
            Slot::Helper(helper) => Resolved::Helper(helper),
        }
    }
}

/// Return true if the given value is empty, meaning null, false, or an
/// array with no elements.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(bool) => !bool,
        Value::Array(array) => array.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, Parents, Resolved};
    use crate::{globals::Globals, path::Path};
    use serde_json::{json, Value};

    #[test]
    fn test_resolve_dig() {
        let globals = Globals::new();
        let context = Context::new(Some(json!({"alan": {"name": "turing"}})), &globals);
        let path = Path::parse("alan/name").unwrap();

        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(value) if value == json!("turing")
        ));
    }

    #[test]
    fn test_resolve_index() {
        let globals = Globals::new();
        let context = Context::new(Some(json!({"items": ["one", "two"]})), &globals);
        let path = Path::parse("items/1").unwrap();

        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(value) if value == json!("two")
        ));
    }

    #[test]
    fn test_resolve_missing_stops_early() {
        let globals = Globals::new();
        let context = Context::new(Some(json!({"alan": null})), &globals);
        let path = Path::parse("alan/name/first").unwrap();

        // Digging stops at the null without an error.
        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(Value::Null)
        ));
    }

    #[test]
    fn test_resolve_fallback() {
        let globals = Globals::new().with_must("name", "fallback");
        let context = Context::new(Some(json!({})), &globals);

        // A missing single-segment lookup falls through to globals.
        let single = Path::parse("name").unwrap();
        assert!(matches!(
            context.resolve(&single, None),
            Resolved::Value(value) if value == json!("fallback")
        ));

        // A multi-segment lookup does not.
        let globals = Globals::new().with_must("name", "fallback");
        let context = Context::new(Some(json!({})), &globals);
        let double = Path::parse("outer/name").unwrap();
        assert!(matches!(
            context.resolve(&double, None),
            Resolved::Missing
        ));
    }

    #[test]
    fn test_resolve_null_skips_fallback() {
        let globals = Globals::new().with_must("name", "fallback");
        let context = Context::new(Some(json!({"name": null})), &globals);
        let path = Path::parse("name").unwrap();

        // A present null is not missing, so globals are not consulted.
        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(Value::Null)
        ));
    }

    #[test]
    fn test_resolve_ascend() {
        let globals = Globals::new();
        let outer = Context::new(Some(json!({"name": "outer"})), &globals);
        let inner = Context::new(Some(json!({"name": "inner"})), &globals);
        let chain = Parents::link(None, &outer);
        let path = Path::parse("../name").unwrap();

        assert!(matches!(
            inner.resolve(&path, Some(&chain)),
            Resolved::Value(value) if value == json!("outer")
        ));
    }

    #[test]
    fn test_resolve_ascend_past_root() {
        let globals = Globals::new().with_must("name", "fallback");
        let context = Context::new(Some(json!({})), &globals);
        let path = Path::parse("../name").unwrap();

        // Ascending past the root yields null, not missing, so the
        // fallback does not fire.
        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(Value::Null)
        ));
    }

    #[test]
    fn test_resolve_empty_path() {
        let globals = Globals::new();
        let context = Context::new(Some(json!("current")), &globals);
        let path = Path::parse("").unwrap();

        assert!(matches!(
            context.resolve(&path, None),
            Resolved::Value(value) if value == json!("current")
        ));
    }

    #[test]
    fn test_chain_ancestor() {
        let globals = Globals::new();
        let root = Context::new(Some(json!("root")), &globals);
        let middle = Context::new(Some(json!("middle")), &globals);

        let first = Parents::link(None, &root);
        let second = Parents::link(Some(&first), &middle);

        assert_eq!(second.len(), 2);
        assert_eq!(second.ancestor(1).data(), Some(&json!("middle")));
        assert_eq!(second.ancestor(2).data(), Some(&json!("root")));
    }

    #[test]
    fn test_is_empty() {
        assert!(Resolved::Missing.is_empty());
        assert!(Resolved::Value(json!(null)).is_empty());
        assert!(Resolved::Value(json!(false)).is_empty());
        assert!(Resolved::Value(json!([])).is_empty());
        assert!(!Resolved::Value(json!("")).is_empty());
        assert!(!Resolved::Value(json!(0)).is_empty());
        assert!(!Resolved::Value(json!({})).is_empty());
        assert!(!Resolved::Safe(String::new()).is_empty());
    }
}

//! Hierarchical parameter store.
//!
//! A [`Context`] is a chain of frames. Lookup walks from the innermost frame
//! outwards and the first binding wins. Pushing a frame with [`Context::child`]
//! shares every ancestor, so it costs the same however deep the chain is.

use core::fmt;
use std::sync::Arc;

use embody_path::Path;
use embody_value::{VObject, Value};
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::EmbodyError;

/// A zero-argument function producing a parameter value on demand.
///
/// It is called at every lookup. Nothing caches its output, so two lookups of the
/// same name, even within one embodiment, may see different values.
#[derive(Clone)]
pub struct Resolver(Arc<dyn Fn() -> Value + Send + Sync>);

impl Resolver {
    /// Wraps a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Resolver(Arc::new(f))
    }

    /// Calls the function.
    pub fn invoke(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// What a name is bound to in a frame.
#[derive(Debug, Clone)]
pub enum Binding {
    /// A fixed value.
    Value(Value),
    /// A function called at every lookup.
    Resolver(Resolver),
}

impl Binding {
    /// The value: the fixed one, or a fresh call of the resolver.
    pub fn resolve(&self) -> Value {
        match self {
            Binding::Value(v) => v.clone(),
            Binding::Resolver(r) => r.invoke(),
        }
    }
}

impl<T: Into<Value>> From<T> for Binding {
    fn from(value: T) -> Self {
        Binding::Value(value.into())
    }
}

impl From<Resolver> for Binding {
    fn from(resolver: Resolver) -> Self {
        Binding::Resolver(resolver)
    }
}

/// One layer of bindings, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    bindings: IndexMap<String, Binding>,
}

impl Frame {
    /// An empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a fixed value, replacing any earlier binding in this frame.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), Binding::Value(value.into()));
    }

    /// Binds `name` to a resolver.
    pub fn insert_resolver<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.bindings
            .insert(name.into(), Binding::Resolver(Resolver::new(f)));
    }

    /// The binding for `name` in this frame only.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the frame binds nothing.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(k, b)| (k.as_str(), b))
    }
}

impl<K: Into<String>, B: Into<Binding>> FromIterator<(K, B)> for Frame {
    fn from_iter<I: IntoIterator<Item = (K, B)>>(iter: I) -> Self {
        Frame {
            bindings: iter
                .into_iter()
                .map(|(k, b)| (k.into(), b.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, B: Into<Binding>, const N: usize> From<[(K, B); N]> for Frame {
    fn from(entries: [(K, B); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<VObject> for Frame {
    fn from(obj: VObject) -> Self {
        obj.into_iter().collect()
    }
}

/// A chain of frames.
///
/// Cloning is cheap: frames are shared.
///
/// ```
/// use embody::Context;
///
/// let base = Context::new().with("env", "prod").with("port", 80);
/// let scoped = base.child([("port", 8080)]);
/// assert_eq!(scoped.get("port"), Some(8080.into()));
/// assert_eq!(scoped.get("env"), Some("prod".into()));
/// assert_eq!(base.get("port"), Some(80.into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    frame: Arc<Frame>,
    parent: Option<Arc<Context>>,
}

impl Context {
    /// A context with one empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixed binding to the innermost frame.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.frame).insert(name, value);
        self
    }

    /// Adds a resolver to the innermost frame.
    pub fn with_resolver<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.frame).insert_resolver(name, f);
        self
    }

    /// Pushes a frame of overrides in front of this context.
    pub fn child(&self, overrides: impl Into<Frame>) -> Context {
        Context {
            frame: Arc::new(overrides.into()),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Frames from innermost to outermost.
    fn frames(&self) -> impl Iterator<Item = &Frame> {
        core::iter::successors(Some(self), |ctx| ctx.parent.as_deref()).map(|ctx| &*ctx.frame)
    }

    /// The innermost binding for `name`, without resolving it.
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.frames().find_map(|frame| frame.get(name))
    }

    /// Resolves `name`, calling its resolver if it has one.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.binding(name).map(Binding::resolve)
    }

    /// Resolves `name`, failing if no frame binds it.
    pub fn lookup(&self, name: &str) -> Result<Value, EmbodyError> {
        self.get(name)
            .ok_or_else(|| EmbodyError::missing(name, &Path::root()))
    }

    /// Returns `true` if some frame binds `name`. Never calls a resolver.
    pub fn contains(&self, name: &str) -> bool {
        self.binding(name).is_some()
    }

    /// Every visible name once, innermost frames first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = IndexSet::new();
        for frame in self.frames() {
            for (name, _) in frame.iter() {
                names.insert(name);
            }
        }
        names.into_iter().collect()
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Resolves every visible binding into one object. Outer names come first and
    /// inner frames override their values.
    pub fn to_value(&self) -> Value {
        let frames: Vec<&Frame> = self.frames().collect();
        let mut out = VObject::new();
        for frame in frames.into_iter().rev() {
            for (name, binding) in frame.iter() {
                out.insert(name, binding.resolve());
            }
        }
        Value::Object(out)
    }
}

impl<T: Into<Frame>> From<T> for Context {
    fn from(frame: T) -> Self {
        Context {
            frame: Arc::new(frame.into()),
            parent: None,
        }
    }
}

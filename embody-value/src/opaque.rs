//! Opaque values: foreign data carried through a Value tree untouched.

use core::any::Any;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use std::sync::Arc;

/// Anything that can ride inside a [`VOpaque`].
///
/// Implemented for every `Any + Debug + Send + Sync` type.
pub trait OpaqueValue: Any + Debug + Send + Sync {
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Debug + Send + Sync> OpaqueValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }
}

/// A shared handle to a foreign value.
///
/// Cloning shares the same allocation, and two handles are equal only when they
/// point at the same allocation. Embodying never looks inside an opaque value,
/// so it comes out of a template exactly as it went in.
#[derive(Clone)]
pub struct VOpaque {
    inner: Arc<dyn OpaqueValue>,
}

impl VOpaque {
    /// Wraps `value`.
    pub fn new<T: OpaqueValue>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Wraps an already shared value.
    pub fn from_arc(inner: Arc<dyn OpaqueValue>) -> Self {
        Self { inner }
    }

    /// Returns the payload as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }

    /// Name of the payload's concrete type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (*self.inner).type_name()
    }

    /// Returns `true` if both handles share one allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &VOpaque) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for VOpaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for VOpaque {}

impl Hash for VOpaque {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Identity-equal handles always share type and debug text.
        self.type_name().hash(state);
        format!("{:?}", self.inner).hash(state);
    }
}

impl Debug for VOpaque {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.inner, f)
    }
}

//! Resolved values are contained in [Scope]s - containers which decide when to reuse or create an
//! instance. Every binding declares a [BindingScope], which selects the container used when
//! resolving it.
//!
//! Note: scope resolution happens at resolution time, which can lead to unexpected consequences if
//! incompatible scopes are mixed together, e.g. a [singleton](BindingScope::Singleton) value can
//! depend on a [transient](BindingScope::Transient) one. In such case when creating the singleton,
//! a new instance of the dependency will be created, but then that single instance will live as
//! long as the singleton lives.

use crate::instance::InstanceAnyPtr;
use fxhash::FxHashMap;
#[cfg(test)]
use mockall::automock;

pub type ScopePtr = Box<dyn Scope + Send + Sync>;

/// Lifetime policy of a binding value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum BindingScope {
    /// A new value is created on each resolution.
    #[default]
    Transient,
    /// A value is created on first resolution and shared afterwards.
    Singleton,
    /// The value is given at binding time.
    Constant,
}

impl BindingScope {
    /// Checks if every resolution yields the same value.
    #[inline]
    pub fn is_shared(self) -> bool {
        matches!(self, BindingScope::Singleton | BindingScope::Constant)
    }
}

/// A scope containing resolved values, indexed by binding key.
#[cfg_attr(test, automock)]
pub trait Scope {
    /// Gets an instance stored for the given binding, if available in this scope.
    fn instance(&self, key: &str) -> Option<InstanceAnyPtr>;

    /// Stores given instance in the scope. The scope might not support storing instances and ignore
    /// it.
    fn store_instance(&mut self, key: &str, instance: InstanceAnyPtr);

    /// Forgets the instance stored for given binding.
    fn remove_instance(&mut self, key: &str);
}

/// Scope for instances shared between all resolutions of a binding.
#[derive(Default)]
pub struct SingletonScope {
    instances: FxHashMap<String, InstanceAnyPtr>,
}

impl Scope for SingletonScope {
    #[inline]
    fn instance(&self, key: &str) -> Option<InstanceAnyPtr> {
        self.instances.get(key).cloned()
    }

    #[inline]
    fn store_instance(&mut self, key: &str, instance: InstanceAnyPtr) {
        self.instances.insert(key.to_string(), instance);
    }

    #[inline]
    fn remove_instance(&mut self, key: &str) {
        self.instances.remove(key);
    }
}

/// A scope which creates a new instance on each resolution.
#[derive(Default, Copy, Clone, Eq, PartialEq)]
pub struct TransientScope;

impl Scope for TransientScope {
    #[inline]
    fn instance(&self, _key: &str) -> Option<InstanceAnyPtr> {
        None
    }

    #[inline]
    fn store_instance(&mut self, _key: &str, _instance: InstanceAnyPtr) {}

    #[inline]
    fn remove_instance(&mut self, _key: &str) {}
}

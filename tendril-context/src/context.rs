//! The [Context] is a registry of [Bindings](Binding), which resolves them into values on request.
//! Bindings are kept in registration order, which is also the order of discovery when searching.
//!
//! Constructors and providers receive a context bound to the current resolution chain, which is
//! used to detect dependency cycles. Independent resolutions, even of the same key, never affect
//! each other.

use crate::binding::{Binding, BindingBuilder, BindingPtr, BindingSource};
use crate::component::{Component, Constructor, Injectable};
use crate::error::{BindingError, ResolutionError};
use crate::future::FutureExt;
use crate::instance::{InstanceAnyPtr, InstancePtr};
use crate::lifecycle::{Lifecycle, LifecycleObserverPtr};
use crate::scope::{BindingScope, ScopePtr, SingletonScope, TransientScope};
use fxhash::FxHashMap;
use std::any::type_name;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

type ScopeCell = InstancePtr<Mutex<ScopePtr>>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
struct Registry {
    bindings: Vec<BindingPtr>,
    keys: FxHashMap<String, usize>,
}

/// Registry of bindings. See module documentation for details.
///
/// Registration requires mutable access, while resolution works on shared references, so that
/// values can resolve their own dependencies. Cached singletons are stored in a [Scope] selected
/// by the [BindingScope] of a binding.
///
/// [Scope]: crate::scope::Scope
pub struct Context {
    registry: InstancePtr<Registry>,
    singleton_scope: ScopeCell,
    transient_scope: ScopeCell,
    resolution_chain: Vec<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates an empty context with default scopes.
    pub fn new() -> Self {
        Self::with_scopes(
            Box::<SingletonScope>::default(),
            Box::<TransientScope>::default(),
        )
    }

    /// Creates an empty context using given scopes for singleton and transient bindings.
    pub fn with_scopes(singleton_scope: ScopePtr, transient_scope: ScopePtr) -> Self {
        Self {
            registry: Default::default(),
            singleton_scope: InstancePtr::new(Mutex::new(singleton_scope)),
            transient_scope: InstancePtr::new(Mutex::new(transient_scope)),
            resolution_chain: vec![],
        }
    }

    /// Starts creating a new binding with given key.
    pub fn bind<K: ToString>(&mut self, key: K) -> BindingBuilder<'_> {
        BindingBuilder::new(self, key.to_string())
    }

    pub(crate) fn add_binding(
        &mut self,
        binding: Binding,
        instance: Option<InstanceAnyPtr>,
    ) -> Result<BindingPtr, BindingError> {
        if binding.key().is_empty() {
            return Err(BindingError::EmptyKey);
        }

        if self.contains(binding.key()) {
            return Err(BindingError::DuplicateKey(binding.key().to_string()));
        }

        debug!(
            key = binding.key(),
            scope = ?binding.scope(),
            binding_type = ?binding.binding_type(),
            "Registering binding."
        );

        let binding = BindingPtr::new(binding);
        if let Some(instance) = instance {
            if binding.scope().is_shared() {
                lock(self.scope(binding.scope())).store_instance(binding.key(), instance);
            }
        }

        let registry = InstancePtr::make_mut(&mut self.registry);
        registry
            .keys
            .insert(binding.key().to_string(), registry.bindings.len());
        registry.bindings.push(binding.clone());

        Ok(binding)
    }

    /// Removes a binding along with its cached value. Locked bindings cannot be removed.
    pub fn unbind(&mut self, key: &str) -> Result<BindingPtr, BindingError> {
        let index = self.index(key)?;
        if self.registry.bindings[index].is_locked() {
            return Err(BindingError::LockedBinding(key.to_string()));
        }

        debug!(key, "Removing binding.");

        let registry = InstancePtr::make_mut(&mut self.registry);
        let binding = registry.bindings.remove(index);
        registry.keys.remove(key);
        for position in registry.keys.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }

        lock(self.scope(binding.scope())).remove_instance(key);

        Ok(binding)
    }

    /// Locks an existing binding, so it cannot be removed anymore.
    pub fn lock(&mut self, key: &str) -> Result<BindingPtr, BindingError> {
        let index = self.index(key)?;

        let registry = InstancePtr::make_mut(&mut self.registry);
        let binding = BindingPtr::new(registry.bindings[index].locked());
        registry.bindings[index] = binding.clone();

        Ok(binding)
    }

    fn index(&self, key: &str) -> Result<usize, BindingError> {
        self.registry
            .keys
            .get(key)
            .copied()
            .ok_or_else(|| BindingError::NotBound(key.to_string()))
    }

    #[inline]
    pub fn binding(&self, key: &str) -> Option<BindingPtr> {
        self.registry
            .keys
            .get(key)
            .and_then(|index| self.registry.bindings.get(*index))
            .cloned()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.registry.keys.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.bindings.is_empty()
    }

    /// Iterates over all bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &BindingPtr> {
        self.registry.bindings.iter()
    }

    /// Returns all bindings matching given filter, in registration order. See
    /// [filter](crate::filter) for common filters.
    pub fn find<F: Fn(&Binding) -> bool>(&self, filter: F) -> Vec<BindingPtr> {
        self.registry
            .bindings
            .iter()
            .filter(|binding| filter(binding))
            .cloned()
            .collect()
    }

    /// Returns all bindings with given tag, in registration order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<BindingPtr> {
        self.find(|binding| binding.has_tag(tag))
    }

    /// Keys currently being resolved in this resolution chain, outermost first. Empty outside
    /// constructors and providers.
    #[inline]
    pub fn resolution_chain(&self) -> &[String] {
        &self.resolution_chain
    }

    /// Resolves the value of a binding with given key.
    pub async fn get<T: Injectable>(&self, key: &str) -> Result<InstancePtr<T>, ResolutionError> {
        let binding = self.required_binding(key)?;
        let instance = self.value(&binding).await?;
        downcast(key, instance)
    }

    /// Synchronous version of [Context::get]. Fails for providers which don't complete immediately.
    pub fn get_sync<T: Injectable>(&self, key: &str) -> Result<InstancePtr<T>, ResolutionError> {
        let binding = self.required_binding(key)?;
        let instance = self.value_sync(&binding)?;
        downcast(key, instance)
    }

    /// Resolves the value of a binding with given key as one of its aliases, e.g. `dyn Trait`.
    pub async fn get_alias<A: ?Sized + 'static>(
        &self,
        key: &str,
    ) -> Result<InstancePtr<A>, ResolutionError> {
        let binding = self.required_binding(key)?;
        let instance = self.value(&binding).await?;
        cast_alias(&binding, instance)
    }

    /// Synchronous version of [Context::get_alias].
    pub fn get_alias_sync<A: ?Sized + 'static>(
        &self,
        key: &str,
    ) -> Result<InstancePtr<A>, ResolutionError> {
        let binding = self.required_binding(key)?;
        let instance = self.value_sync(&binding)?;
        cast_alias(&binding, instance)
    }

    /// Resolves given binding and checks if the value is a lifecycle observer.
    pub async fn lifecycle(&self, binding: &Binding) -> Result<Lifecycle, ResolutionError> {
        let instance = self.value(binding).await?;
        Ok(binding
            .aliases()
            .cast_instance::<LifecycleObserverPtr>(instance)
            .map(Lifecycle::Observer)
            .unwrap_or(Lifecycle::Passive))
    }

    /// Resolves the type-erased value of given binding.
    pub async fn value(&self, binding: &Binding) -> Result<InstanceAnyPtr, ResolutionError> {
        let provider = match binding.source() {
            BindingSource::Constant(value) => return Ok(value.clone()),
            BindingSource::Class(constructor) => return self.construct(binding, *constructor),
            BindingSource::Provider(provider) => provider.clone(),
        };

        if let Some(instance) = self.cached_instance(binding) {
            return Ok(instance);
        }

        let context = self.resolving(binding.key())?;
        let instance = provider
            .provide(&context)
            .await
            .map_err(|error| ResolutionError::ProviderError {
                key: binding.key().to_string(),
                error,
            })?;

        Ok(self.store_instance(binding, instance))
    }

    /// Synchronous version of [Context::value].
    pub fn value_sync(&self, binding: &Binding) -> Result<InstanceAnyPtr, ResolutionError> {
        let provider = match binding.source() {
            BindingSource::Constant(value) => return Ok(value.clone()),
            BindingSource::Class(constructor) => return self.construct(binding, *constructor),
            BindingSource::Provider(provider) => provider.clone(),
        };

        if let Some(instance) = self.cached_instance(binding) {
            return Ok(instance);
        }

        let context = self.resolving(binding.key())?;
        let instance = provider
            .provide(&context)
            .now_or_never()
            .ok_or_else(|| ResolutionError::AsyncResolution(binding.key().to_string()))?
            .map_err(|error| ResolutionError::ProviderError {
                key: binding.key().to_string(),
                error,
            })?;

        Ok(self.store_instance(binding, instance))
    }

    fn construct(
        &self,
        binding: &Binding,
        constructor: Constructor,
    ) -> Result<InstanceAnyPtr, ResolutionError> {
        if let Some(instance) = self.cached_instance(binding) {
            return Ok(instance);
        }

        let instance = constructor(&self.resolving(binding.key())?)?;
        Ok(self.store_instance(binding, instance))
    }

    /// Creates a new instance of a component, without registering it. Dependencies are resolved
    /// from this context.
    pub fn instantiate<T: Component>(&self) -> Result<InstancePtr<T>, ResolutionError> {
        T::create(self).map(InstancePtr::new)
    }

    /// Creates a view of this context used while resolving given key. The view shares bindings and
    /// scopes, but extends the resolution chain.
    fn resolving(&self, key: &str) -> Result<Context, ResolutionError> {
        if self.resolution_chain.iter().any(|resolving| resolving == key) {
            return Err(ResolutionError::DependencyCycle(key.to_string()));
        }

        trace!(key, depth = self.resolution_chain.len(), "Resolving binding.");

        let mut resolution_chain = self.resolution_chain.clone();
        resolution_chain.push(key.to_string());

        Ok(Self {
            registry: self.registry.clone(),
            singleton_scope: self.singleton_scope.clone(),
            transient_scope: self.transient_scope.clone(),
            resolution_chain,
        })
    }

    fn required_binding(&self, key: &str) -> Result<BindingPtr, ResolutionError> {
        self.binding(key)
            .ok_or_else(|| ResolutionError::NotBound(key.to_string()))
    }

    fn cached_instance(&self, binding: &Binding) -> Option<InstanceAnyPtr> {
        lock(self.scope(binding.scope())).instance(binding.key())
    }

    /// Stores a freshly created instance. If a concurrent resolution of a shared binding finished
    /// first, its instance wins, so all resolutions observe the same value.
    fn store_instance(&self, binding: &Binding, instance: InstanceAnyPtr) -> InstanceAnyPtr {
        let mut scope = lock(self.scope(binding.scope()));
        if let Some(existing) = scope.instance(binding.key()) {
            return existing;
        }

        scope.store_instance(binding.key(), instance.clone());
        instance
    }

    fn scope(&self, scope: BindingScope) -> &Mutex<ScopePtr> {
        match scope {
            BindingScope::Transient => &*self.transient_scope,
            BindingScope::Singleton | BindingScope::Constant => &*self.singleton_scope,
        }
    }
}

fn downcast<T: Injectable>(
    key: &str,
    instance: InstanceAnyPtr,
) -> Result<InstancePtr<T>, ResolutionError> {
    instance
        .downcast::<T>()
        .map_err(|_| ResolutionError::IncompatibleValue {
            key: key.to_string(),
            type_name: type_name::<T>(),
        })
}

fn cast_alias<A: ?Sized + 'static>(
    binding: &Binding,
    instance: InstanceAnyPtr,
) -> Result<InstancePtr<A>, ResolutionError> {
    binding
        .aliases()
        .cast_instance::<A>(instance)
        .ok_or_else(|| ResolutionError::IncompatibleValue {
            key: binding.key().to_string(),
            type_name: type_name::<A>(),
        })
}

#[cfg(test)]
mod tests {
    use crate::component::{Aliases, Component, Injectable};
    use crate::context::Context;
    use crate::error::{BindingError, ResolutionError};
    use crate::filter::{in_scopes, with_any_tag, with_tag};
    use crate::future::{BoxFuture, FutureExt};
    use crate::instance::{ErrorPtr, InstancePtr};
    use crate::lifecycle::{LifecycleObserver, LifecycleObserverPtr};
    use crate::provider::Provider;
    use crate::scope::{BindingScope, MockScope, ScopePtr, TransientScope};
    use mockall::predicate::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static CREATED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Injectable for Counted {}

    impl Component for Counted {
        fn create(_context: &Context) -> Result<Self, ResolutionError> {
            CREATED.fetch_add(1, Ordering::SeqCst);
            Ok(Self)
        }
    }

    struct Observer;

    impl Injectable for Observer {
        fn aliases(aliases: &mut Aliases) {
            aliases.lifecycle_observer::<Self>();
        }
    }

    impl LifecycleObserver for Observer {}

    struct SelfDependent;

    impl Injectable for SelfDependent {}

    impl Component for SelfDependent {
        fn create(context: &Context) -> Result<Self, ResolutionError> {
            context.get_sync::<SelfDependent>("cycle")?;
            Ok(Self)
        }
    }

    struct PendingProvider;

    impl Provider for PendingProvider {
        type Value = Observer;

        fn value<'a>(&'a self, _context: &'a Context) -> BoxFuture<'a, Result<Self::Value, ErrorPtr>> {
            async {
                tokio::task::yield_now().await;
                Ok(Observer)
            }
            .boxed()
        }
    }

    struct FailingProvider;

    impl Provider for FailingProvider {
        type Value = Observer;

        fn value<'a>(&'a self, _context: &'a Context) -> BoxFuture<'a, Result<Self::Value, ErrorPtr>> {
            async { Err(Arc::new(io::Error::from(io::ErrorKind::NotFound)) as ErrorPtr) }.boxed()
        }
    }

    #[test]
    fn should_reject_duplicate_keys() {
        let mut context = Context::new();
        context.bind("a").to(1u8).register().unwrap();

        assert_eq!(
            context.bind("a").to(2u8).register().unwrap_err(),
            BindingError::DuplicateKey("a".to_string())
        );
        assert_eq!(*context.get_sync::<u8>("a").unwrap(), 1);
    }

    #[test]
    fn should_reject_empty_keys() {
        let mut context = Context::new();
        assert_eq!(
            context.bind("").to(1u8).register().unwrap_err(),
            BindingError::EmptyKey
        );
    }

    #[test]
    fn should_find_in_registration_order() {
        let mut context = Context::new();
        context.bind("c").to(1u8).tag("x").register().unwrap();
        context.bind("a").to(2u8).register().unwrap();
        context
            .bind("b")
            .to_class::<Counted>()
            .tag("y")
            .register()
            .unwrap();

        let keys = |bindings: Vec<crate::binding::BindingPtr>| {
            bindings
                .iter()
                .map(|binding| binding.key().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(keys(context.find(|_| true)), ["c", "a", "b"]);
        assert_eq!(keys(context.find(with_tag("x"))), ["c"]);
        assert_eq!(keys(context.find(with_any_tag(&["x", "y"]))), ["c", "b"]);
        assert_eq!(
            keys(context.find(in_scopes(&[BindingScope::Transient]))),
            ["b"]
        );
        assert_eq!(keys(context.find_by_tag("y")), ["b"]);
    }

    #[test]
    fn should_cache_singletons_only() {
        let mut context = Context::new();
        context
            .bind("singleton")
            .to_class::<Counted>()
            .in_scope(BindingScope::Singleton)
            .register()
            .unwrap();
        context
            .bind("transient")
            .to_class::<Counted>()
            .register()
            .unwrap();

        let singleton_1 = context.get_sync::<Counted>("singleton").unwrap();
        let singleton_2 = context.get_sync::<Counted>("singleton").unwrap();
        assert!(InstancePtr::ptr_eq(&singleton_1, &singleton_2));

        let transient_1 = context.get_sync::<Counted>("transient").unwrap();
        let transient_2 = context.get_sync::<Counted>("transient").unwrap();
        assert!(!InstancePtr::ptr_eq(&transient_1, &transient_2));
    }

    #[test]
    fn should_use_seeded_singleton() {
        let mut context = Context::new();
        let instance = InstancePtr::new(Counted);
        context
            .bind("a")
            .to_class_instance(instance.clone())
            .register()
            .unwrap();

        assert!(InstancePtr::ptr_eq(
            &context.get_sync::<Counted>("a").unwrap(),
            &instance
        ));
    }

    #[test]
    fn should_store_in_configured_scope() {
        let mut singleton_scope = MockScope::new();
        singleton_scope
            .expect_instance()
            .with(eq("a"))
            .times(2)
            .return_const(None);
        singleton_scope
            .expect_store_instance()
            .withf(|key, _| key == "a")
            .times(1)
            .return_const(());

        let mut context = Context::with_scopes(
            Box::new(singleton_scope) as ScopePtr,
            Box::<TransientScope>::default(),
        );
        context
            .bind("a")
            .to_class::<Counted>()
            .in_scope(BindingScope::Singleton)
            .register()
            .unwrap();

        context.get_sync::<Counted>("a").unwrap();
    }

    #[test]
    fn should_detect_dependency_cycles() {
        let mut context = Context::new();
        context
            .bind("cycle")
            .to_class::<SelfDependent>()
            .register()
            .unwrap();

        assert!(matches!(
            context.get_sync::<SelfDependent>("cycle").err().unwrap(),
            ResolutionError::DependencyCycle(key) if key == "cycle"
        ));

        // resolution state is cleaned up after a failure
        assert!(matches!(
            context.get_sync::<SelfDependent>("cycle").err().unwrap(),
            ResolutionError::DependencyCycle(_)
        ));
    }

    #[test]
    fn should_report_missing_and_incompatible_bindings() {
        let mut context = Context::new();
        context.bind("a").to(1u8).register().unwrap();

        assert!(matches!(
            context.get_sync::<u8>("b").unwrap_err(),
            ResolutionError::NotBound(_)
        ));
        assert!(matches!(
            context.get_sync::<u16>("a").unwrap_err(),
            ResolutionError::IncompatibleValue { .. }
        ));
        assert!(matches!(
            context.get_alias_sync::<LifecycleObserverPtr>("a").err().unwrap(),
            ResolutionError::IncompatibleValue { .. }
        ));
    }

    #[tokio::test]
    async fn should_resolve_providers() {
        let mut context = Context::new();
        context
            .bind("a")
            .to_provider(PendingProvider)
            .in_scope(BindingScope::Singleton)
            .register()
            .unwrap();

        assert!(matches!(
            context.get_sync::<Observer>("a").err().unwrap(),
            ResolutionError::AsyncResolution(_)
        ));

        let first = context.get::<Observer>("a").await.unwrap();
        let second = context.get::<Observer>("a").await.unwrap();
        assert!(InstancePtr::ptr_eq(&first, &second));

        // cached now, so synchronous resolution works
        assert!(context.get_sync::<Observer>("a").is_ok());
        assert!(context
            .get_alias::<LifecycleObserverPtr>("a")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn should_resolve_after_abandoned_resolution() {
        let mut context = Context::new();
        context
            .bind("a")
            .to_provider(PendingProvider)
            .in_scope(BindingScope::Singleton)
            .register()
            .unwrap();

        // dropped while the provider is suspended
        assert!(context.get::<Observer>("a").now_or_never().is_none());

        assert!(context.get::<Observer>("a").await.is_ok());
    }

    #[tokio::test]
    async fn should_share_singleton_between_concurrent_resolutions() {
        let mut context = Context::new();
        context
            .bind("a")
            .to_provider(PendingProvider)
            .in_scope(BindingScope::Singleton)
            .register()
            .unwrap();

        let (first, second) = tokio::join!(
            context.get::<Observer>("a"),
            context.get::<Observer>("a")
        );
        assert!(InstancePtr::ptr_eq(&first.unwrap(), &second.unwrap()));
    }

    #[test]
    fn should_pass_resolution_chain_to_constructors() {
        struct Inner;

        impl Injectable for Inner {}

        impl Component for Inner {
            fn create(context: &Context) -> Result<Self, ResolutionError> {
                assert_eq!(context.resolution_chain(), ["outer", "inner"]);
                Ok(Self)
            }
        }

        struct Outer;

        impl Injectable for Outer {}

        impl Component for Outer {
            fn create(context: &Context) -> Result<Self, ResolutionError> {
                assert_eq!(context.resolution_chain(), ["outer"]);
                context.get_sync::<Inner>("inner")?;
                Ok(Self)
            }
        }

        let mut context = Context::new();
        context.bind("outer").to_class::<Outer>().register().unwrap();
        context.bind("inner").to_class::<Inner>().register().unwrap();

        context.get_sync::<Outer>("outer").unwrap();
        assert!(context.resolution_chain().is_empty());
    }

    #[tokio::test]
    async fn should_forward_provider_errors() {
        let mut context = Context::new();
        context
            .bind("a")
            .to_provider(FailingProvider)
            .register()
            .unwrap();

        assert!(matches!(
            context.get::<Observer>("a").await.err().unwrap(),
            ResolutionError::ProviderError { key, .. } if key == "a"
        ));
    }

    #[tokio::test]
    async fn should_discover_lifecycle_capability() {
        let mut context = Context::new();
        let observer = context.bind("observer").to(Observer).register().unwrap();
        let passive = context.bind("passive").to(1u8).register().unwrap();

        assert!(context.lifecycle(&observer).await.unwrap().is_observer());
        assert!(!context.lifecycle(&passive).await.unwrap().is_observer());
    }

    #[test]
    fn should_unbind_unlocked_bindings() {
        let mut context = Context::new();
        context.bind("a").to(1u8).register().unwrap();
        context.bind("b").to(2u8).lock().register().unwrap();
        context.bind("c").to(3u8).register().unwrap();

        assert_eq!(context.unbind("a").unwrap().key(), "a");
        assert_eq!(
            context.unbind("b").unwrap_err(),
            BindingError::LockedBinding("b".to_string())
        );
        assert_eq!(
            context.unbind("a").unwrap_err(),
            BindingError::NotBound("a".to_string())
        );

        assert_eq!(context.len(), 2);
        assert_eq!(*context.get_sync::<u8>("c").unwrap(), 3);
        assert_eq!(*context.get_sync::<u8>("b").unwrap(), 2);

        context.bind("a").to(4u8).register().unwrap();
        assert_eq!(*context.get_sync::<u8>("a").unwrap(), 4);
    }

    #[test]
    fn should_lock_registered_binding() {
        let mut context = Context::new();
        context.bind("a").to(1u8).tag("t").register().unwrap();

        let binding = context.lock("a").unwrap();
        assert!(binding.is_locked());
        assert_eq!(binding.tag("t"), Some("t"));
        assert!(context.binding("a").unwrap().is_locked());
        assert_eq!(
            context.unbind("a").unwrap_err(),
            BindingError::LockedBinding("a".to_string())
        );
        assert_eq!(
            context.lock("b").unwrap_err(),
            BindingError::NotBound("b".to_string())
        );
    }

    #[test]
    fn should_resolve_constant_as_is() {
        let mut context = Context::new();
        let value = InstancePtr::new(5u8);
        context.bind("a").to_instance(value.clone()).register().unwrap();

        let resolved = context.get_sync::<u8>("a").unwrap();
        assert!(InstancePtr::ptr_eq(&resolved, &value));

        let binding = context.binding("a").unwrap();
        assert!(context
            .value_sync(&binding)
            .unwrap()
            .downcast::<u8>()
            .is_ok());
    }
}

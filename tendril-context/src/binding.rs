//! Bindings associate a key with a value source, a [BindingScope] and a set of tags. They are
//! created by a [BindingBuilder] and become immutable once registered in a
//! [Context](crate::context::Context).

use crate::component::{construct, Aliases, Class, Component, Constructor, Injectable};
use crate::context::Context;
use crate::error::BindingError;
use crate::instance::{CastFunction, InstanceAnyPtr, InstancePtr};
use crate::provider::{provider_ptr, AnyProvider, Provider, ProviderPtr};
use crate::scope::BindingScope;
use derivative::Derivative;
use fxhash::FxHashMap;
use std::any::type_name;

pub type BindingPtr = InstancePtr<Binding>;

/// Tag names mapped to tag values.
pub type TagMap = FxHashMap<String, String>;

/// Kind of value source of a binding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BindingType {
    Constant,
    Class,
    Provider,
}

#[derive(Clone)]
pub(crate) enum BindingSource {
    Constant(InstanceAnyPtr),
    Class(Constructor),
    Provider(ProviderPtr),
}

impl BindingSource {
    fn binding_type(&self) -> BindingType {
        match self {
            BindingSource::Constant(_) => BindingType::Constant,
            BindingSource::Class(_) => BindingType::Class,
            BindingSource::Provider(_) => BindingType::Provider,
        }
    }
}

/// A registered binding.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Binding {
    key: String,
    scope: BindingScope,
    tags: TagMap,
    locked: bool,
    value_type_name: &'static str,
    #[derivative(Debug = "ignore")]
    source: BindingSource,
    aliases: Aliases,
}

impl Binding {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn binding_type(&self) -> BindingType {
        self.source.binding_type()
    }

    #[inline]
    pub fn scope(&self) -> BindingScope {
        self.scope
    }

    #[inline]
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Returns the value of given tag, if present.
    #[inline]
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Name of the type this binding resolves to.
    #[inline]
    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    #[inline]
    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    pub(crate) fn locked(&self) -> Self {
        Self {
            locked: true,
            ..self.clone()
        }
    }

    #[inline]
    pub(crate) fn source(&self) -> &BindingSource {
        &self.source
    }
}

/// Builder for [Binding]s, created by [Context::bind]. Nothing is registered until
/// [BindingBuilder::register] is called.
pub struct BindingBuilder<'a> {
    context: &'a mut Context,
    key: String,
    scope: Option<BindingScope>,
    tags: TagMap,
    locked: bool,
    source: Option<(BindingSource, &'static str)>,
    aliases: Aliases,
    instance: Option<InstanceAnyPtr>,
}

impl<'a> BindingBuilder<'a> {
    pub(crate) fn new(context: &'a mut Context, key: String) -> Self {
        Self {
            context,
            key,
            scope: None,
            tags: Default::default(),
            locked: false,
            source: None,
            aliases: Default::default(),
            instance: None,
        }
    }

    /// Binds a constant value. Constant bindings always have the [BindingScope::Constant] scope.
    pub fn to<T: Injectable>(self, value: T) -> Self {
        self.to_instance(InstancePtr::new(value))
    }

    /// Binds an already shared constant value.
    pub fn to_instance<T: Injectable>(mut self, value: InstancePtr<T>) -> Self {
        self.source = Some((
            BindingSource::Constant(value as InstanceAnyPtr),
            type_name::<T>(),
        ));
        self.aliases.extend(&Aliases::of::<T>());
        self
    }

    /// Binds a component class, which will be created by the context on resolution.
    pub fn to_class<T: Component>(mut self) -> Self {
        self.source = Some((BindingSource::Class(construct::<T>), type_name::<T>()));
        self.aliases.extend(&Aliases::of::<T>());
        self
    }

    /// Binds a type-erased component class.
    pub fn to_class_of(mut self, class: &Class) -> Self {
        self.source = Some((BindingSource::Class(class.constructor()), class.type_name()));
        self.aliases.extend(class.aliases());
        self
    }

    /// Binds a component class as a singleton, which has already been created.
    pub fn to_class_instance<T: Component>(mut self, instance: InstancePtr<T>) -> Self {
        self.instance = Some(instance as InstanceAnyPtr);
        self.scope = Some(BindingScope::Singleton);
        self.to_class::<T>()
    }

    /// Binds a provider.
    pub fn to_provider<P: Provider>(self, provider: P) -> Self {
        self.to_provider_ptr(provider_ptr(provider))
    }

    /// Binds a type-erased provider.
    pub fn to_provider_ptr(mut self, provider: ProviderPtr) -> Self {
        self.aliases.extend(&provider.aliases());
        self.source = Some((
            BindingSource::Provider(provider.clone()),
            provider.value_type_name(),
        ));
        self
    }

    pub fn in_scope(mut self, scope: BindingScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Adds a tag with its name as the value.
    pub fn tag(self, tag: &str) -> Self {
        self.tag_value(tag, tag)
    }

    pub fn tag_value(mut self, tag: &str, value: &str) -> Self {
        self.tags.insert(tag.to_string(), value.to_string());
        self
    }

    /// Registers an additional alias for the bound value.
    pub fn alias<A: ?Sized + 'static>(mut self, cast: CastFunction) -> Self {
        self.aliases.register::<A>(cast);
        self
    }

    /// Prevents the binding from being removed.
    pub fn lock(mut self) -> Self {
        self.locked = true;
        self
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Registers the binding in the context.
    pub fn register(self) -> Result<BindingPtr, BindingError> {
        let (source, value_type_name) = self
            .source
            .ok_or_else(|| BindingError::MissingValue(self.key.clone()))?;

        let scope = match source {
            BindingSource::Constant(_) => BindingScope::Constant,
            _ => self.scope.unwrap_or_default(),
        };

        let binding = Binding {
            key: self.key,
            scope,
            tags: self.tags,
            locked: self.locked,
            value_type_name,
            source,
            aliases: self.aliases,
        };

        self.context.add_binding(binding, self.instance)
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::BindingType;
    use crate::component::{Aliases, Component, Injectable};
    use crate::context::Context;
    use crate::error::{BindingError, ResolutionError};
    use crate::future::{BoxFuture, FutureExt};
    use crate::instance::ErrorPtr;
    use crate::lifecycle::LifecycleObserver;
    use crate::provider::Provider;
    use crate::scope::BindingScope;

    struct TestComponent;

    impl Injectable for TestComponent {
        fn aliases(aliases: &mut Aliases) {
            aliases.lifecycle_observer::<Self>();
        }
    }

    impl LifecycleObserver for TestComponent {}

    impl Component for TestComponent {
        fn create(_context: &Context) -> Result<Self, ResolutionError> {
            Ok(Self)
        }
    }

    struct TestProvider;

    impl Provider for TestProvider {
        type Value = TestComponent;

        fn value<'a>(&'a self, _context: &'a Context) -> BoxFuture<'a, Result<Self::Value, ErrorPtr>> {
            async { Ok(TestComponent) }.boxed()
        }
    }

    #[test]
    fn should_build_constant_binding() {
        let mut context = Context::new();
        let binding = context
            .bind("a")
            .to(TestComponent)
            .in_scope(BindingScope::Transient)
            .tag("t1")
            .tag_value("t2", "v2")
            .register()
            .unwrap();

        assert_eq!(binding.key(), "a");
        assert_eq!(binding.binding_type(), BindingType::Constant);
        assert_eq!(binding.scope(), BindingScope::Constant);
        assert_eq!(binding.tag("t1"), Some("t1"));
        assert_eq!(binding.tag("t2"), Some("v2"));
        assert!(!binding.has_tag("t3"));
        assert!(binding.aliases().is_lifecycle_observer());
        assert!(!binding.is_locked());
    }

    #[test]
    fn should_build_class_binding() {
        let mut context = Context::new();
        let binding = context
            .bind("a")
            .to_class::<TestComponent>()
            .in_scope(BindingScope::Singleton)
            .lock()
            .register()
            .unwrap();

        assert_eq!(binding.binding_type(), BindingType::Class);
        assert_eq!(binding.scope(), BindingScope::Singleton);
        assert!(binding.is_locked());
        assert!(binding.value_type_name().ends_with("TestComponent"));
    }

    #[test]
    fn should_default_to_transient_scope() {
        let mut context = Context::new();
        let binding = context.bind("a").to_provider(TestProvider).register().unwrap();

        assert_eq!(binding.binding_type(), BindingType::Provider);
        assert_eq!(binding.scope(), BindingScope::Transient);
        assert!(binding.aliases().is_lifecycle_observer());
    }

    #[test]
    fn should_reject_binding_without_value() {
        let mut context = Context::new();
        assert_eq!(
            context.bind("a").tag("t").register().unwrap_err(),
            BindingError::MissingValue("a".to_string())
        );
        assert!(!context.contains("a"));
    }
}

//! Values which can be bound in a [Context] are [Injectable]. Types which can also be created by
//! the context on demand are [Component]s - their instances are constructed synchronously, using
//! other values from the context if needed.
//!
//! ## Aliases
//!
//! Resolution is based on concrete types, but values are often needed as some `dyn Trait`. Each
//! injectable type can register such trait-object views as [Aliases], which are then attached to
//! every binding of the type. The most important alias is the
//! [LifecycleObserver](crate::lifecycle::LifecycleObserver) one, which makes the value take part in
//! application start/stop:
//!
//! ```
//! use tendril_context::component::{Aliases, Component, Injectable};
//! use tendril_context::context::Context;
//! use tendril_context::error::ResolutionError;
//! use tendril_context::lifecycle::LifecycleObserver;
//!
//! struct Cache;
//!
//! impl Injectable for Cache {
//!     fn aliases(aliases: &mut Aliases) {
//!         aliases.lifecycle_observer::<Self>();
//!     }
//! }
//!
//! // default start() and stop() do nothing
//! impl LifecycleObserver for Cache {}
//!
//! impl Component for Cache {
//!     fn create(_context: &Context) -> Result<Self, ResolutionError> {
//!         Ok(Cache)
//!     }
//! }
//! ```

use crate::context::Context;
use crate::error::ResolutionError;
use crate::instance::{CastFunction, InstanceAnyPtr, InstancePtr};
use crate::lifecycle::{cast_observer, LifecycleObserver, LifecycleObserverPtr};
use convert_case::{Case, Casing};
use derivative::Derivative;
use fxhash::FxHashMap;
use std::any::{type_name, TypeId};
use std::fmt::{Debug, Formatter};

/// Marker trait for values which can be bound in a [Context].
pub trait Injectable: Send + Sync + 'static {
    /// Registers trait-object views of this type. Nothing is registered by default.
    fn aliases(_aliases: &mut Aliases) {}
}

macro_rules! impl_injectable {
    ($($type:ty),*) => {
        $(impl Injectable for $type {})*
    };
}

impl_injectable!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, String
);

/// An [Injectable] type which can be created by the [Context] itself.
pub trait Component: Injectable + Sized {
    /// Creates an instance of this component using values from given [Context]. Components are
    /// created synchronously, so only synchronous resolution should be used.
    fn create(context: &Context) -> Result<Self, ResolutionError>;
}

/// Constructor for type-erased component instances.
pub type Constructor = fn(context: &Context) -> Result<InstanceAnyPtr, ResolutionError>;

/// Collection of trait-object views registered for a given type.
#[derive(Clone, Default)]
pub struct Aliases {
    casts: FxHashMap<TypeId, CastFunction>,
}

impl Debug for Aliases {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aliases")
            .field("count", &self.casts.len())
            .finish()
    }
}

impl Aliases {
    /// Collects aliases registered by given type.
    pub fn of<T: Injectable>() -> Self {
        let mut aliases = Self::default();
        T::aliases(&mut aliases);
        aliases
    }

    /// Registers a cast to `InstancePtr<A>`.
    pub fn register<A: ?Sized + 'static>(&mut self, cast: CastFunction) -> &mut Self {
        self.casts.insert(TypeId::of::<A>(), cast);
        self
    }

    /// Registers given type as a [LifecycleObserver].
    pub fn lifecycle_observer<T: LifecycleObserver + Send + Sync + 'static>(
        &mut self,
    ) -> &mut Self {
        self.register::<LifecycleObserverPtr>(cast_observer::<T>)
    }

    /// Adds all aliases from `other`, overwriting existing ones.
    pub fn extend(&mut self, other: &Aliases) {
        self.casts.extend(other.casts.iter().map(|(id, cast)| (*id, *cast)));
    }

    #[inline]
    pub fn contains<A: ?Sized + 'static>(&self) -> bool {
        self.casts.contains_key(&TypeId::of::<A>())
    }

    #[inline]
    pub fn is_lifecycle_observer(&self) -> bool {
        self.contains::<LifecycleObserverPtr>()
    }

    /// Tries to view given instance as `A`.
    pub fn cast_instance<A: ?Sized + 'static>(
        &self,
        instance: InstanceAnyPtr,
    ) -> Option<InstancePtr<A>> {
        let cast = self.casts.get(&TypeId::of::<A>())?;
        cast(instance)
            .ok()
            .and_then(|boxed| boxed.downcast::<InstancePtr<A>>().ok())
            .map(|instance| *instance)
    }
}

/// Type-erased [Component] class, used where a collection of different component types needs to
/// be declared, e.g. servers of an application component.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Class {
    type_name: &'static str,
    #[derivative(Debug = "ignore")]
    constructor: Constructor,
    aliases: Aliases,
}

impl Class {
    /// Creates a class for given component type.
    pub fn of<T: Component>() -> Self {
        Self {
            type_name: type_name::<T>(),
            constructor: construct::<T>,
            aliases: Aliases::of::<T>(),
        }
    }

    /// Creates a class for given component type, which is always exposed as a [LifecycleObserver].
    pub fn observer<T: Component + LifecycleObserver>() -> Self {
        Self::of::<T>().with_alias::<LifecycleObserverPtr>(cast_observer::<T>)
    }

    /// Adds an alias on top of the ones registered by the type itself.
    pub fn with_alias<A: ?Sized + 'static>(mut self, cast: CastFunction) -> Self {
        self.aliases.register::<A>(cast);
        self
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name derived from the type name, converted to snake case, e.g. `rest_server`.
    pub fn default_name(&self) -> String {
        default_name(self.type_name)
    }

    #[inline]
    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    #[inline]
    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }
}

/// Derives a binding name from a type name, e.g. `app::server::RestServer<T>` becomes
/// `rest_server`.
pub fn default_name(type_name: &str) -> String {
    let name = type_name.split('<').next().unwrap_or(type_name);
    name.rsplit("::")
        .next()
        .unwrap_or(name)
        .to_case(Case::Snake)
}

pub(crate) fn construct<T: Component>(
    context: &Context,
) -> Result<InstanceAnyPtr, ResolutionError> {
    T::create(context).map(|instance| InstancePtr::new(instance) as InstanceAnyPtr)
}

//! Providers create binding values asynchronously, e.g. when opening a connection is needed before
//! a value can be used.

use crate::component::{Aliases, Injectable};
use crate::context::Context;
use crate::future::{BoxFuture, FutureExt};
use crate::instance::{ErrorPtr, InstanceAnyPtr, InstancePtr};

pub type ProviderPtr = InstancePtr<dyn AnyProvider>;

/// Factory for values of a provider binding.
pub trait Provider: Send + Sync + 'static {
    type Value: Injectable;

    /// Creates a new value, possibly using other values from the [Context].
    fn value<'a>(&'a self, context: &'a Context) -> BoxFuture<'a, Result<Self::Value, ErrorPtr>>;
}

/// Type-erased [Provider], implemented for every provider.
pub trait AnyProvider: Send + Sync {
    fn provide<'a>(&'a self, context: &'a Context)
        -> BoxFuture<'a, Result<InstanceAnyPtr, ErrorPtr>>;

    /// Aliases of the provided value type.
    fn aliases(&self) -> Aliases;

    fn value_type_name(&self) -> &'static str;
}

impl<P: Provider> AnyProvider for P {
    fn provide<'a>(
        &'a self,
        context: &'a Context,
    ) -> BoxFuture<'a, Result<InstanceAnyPtr, ErrorPtr>> {
        async move {
            self.value(context)
                .await
                .map(|value| InstancePtr::new(value) as InstanceAnyPtr)
        }
        .boxed()
    }

    fn aliases(&self) -> Aliases {
        Aliases::of::<P::Value>()
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<P::Value>()
    }
}

/// Wraps a provider for use as a declaration, e.g. in application components.
pub fn provider_ptr<P: Provider>(provider: P) -> ProviderPtr {
    InstancePtr::new(provider) as ProviderPtr
}

//! Functionality related to defining [Controller]s.

use axum::Router;
use fxhash::FxHashSet;
#[cfg(test)]
use mockall::automock;
use std::any::Any;
use tendril_context::component::Aliases;
use tendril_context::instance::{InstanceAnyPtr, InstancePtr};

pub type ControllerPtr = dyn Controller + Send + Sync;

/// Main trait for [Components](tendril_context::component::Component) used as controllers -
/// collections of web [handlers](axum::handler::Handler), which add their routes to the
/// [Router] of a server. Controllers are regular components, so they can depend on other values
/// from the context.
///
/// Controllers need to expose the [ControllerPtr] alias (see [ControllerAliases]) and are usually
/// registered with [Application::controller](tendril::application::Application::controller).
#[cfg_attr(test, automock)]
pub trait Controller {
    /// Adds routes handled by this controller.
    fn configure_router(&self, router: Router) -> Router;

    /// Names of servers this controller should be available on. All servers by default.
    fn server_names(&self) -> Option<FxHashSet<String>> {
        None
    }
}

/// Registration of the [Controller] alias.
pub trait ControllerAliases {
    fn controller<T: Controller + Send + Sync + 'static>(&mut self) -> &mut Self;
}

impl ControllerAliases for Aliases {
    fn controller<T: Controller + Send + Sync + 'static>(&mut self) -> &mut Self {
        self.register::<ControllerPtr>(cast_controller::<T>)
    }
}

/// Casts a type-erased instance of `T` to a [ControllerPtr].
pub fn cast_controller<T: Controller + Send + Sync + 'static>(
    instance: InstanceAnyPtr,
) -> Result<Box<dyn Any>, InstanceAnyPtr> {
    instance
        .downcast::<T>()
        .map(|instance| Box::new(instance as InstancePtr<ControllerPtr>) as Box<dyn Any>)
}

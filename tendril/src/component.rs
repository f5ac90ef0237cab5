//! Application components bundle related controllers, servers, providers and lifecycle observers,
//! so they can be registered together with a single
//! [Application::component](crate::application::Application::component) call.

use crate::server::ServerClass;
use tendril_context::component::{Class, Component};
use tendril_context::provider::ProviderPtr;

/// Descriptor of artifacts registered when mounting a component. Every declaration is optional.
pub trait ApplicationComponent: Component {
    /// Controller classes, registered under their default names.
    fn controllers(&self) -> Vec<Class> {
        vec![]
    }

    /// Server classes with their names.
    fn servers(&self) -> Vec<(String, ServerClass)> {
        vec![]
    }

    /// Providers with their binding keys.
    fn providers(&self) -> Vec<(String, ProviderPtr)> {
        vec![]
    }

    /// Lifecycle observer classes, registered under their default names. Use
    /// [Class::observer] to create them.
    fn lifecycle_observers(&self) -> Vec<Class> {
        vec![]
    }
}

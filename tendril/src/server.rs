//! Servers are entry points accepting external traffic. They are always lifecycle observers and
//! get started after, and stopped before, all other observers.

use std::any::Any;
use tendril_context::component::{Class, Component};
use tendril_context::instance::{InstanceAnyPtr, InstancePtr};
use tendril_context::lifecycle::{cast_observer, LifecycleObserver, LifecycleObserverPtr};

pub type ServerPtr = dyn Server + Send + Sync;

/// A [LifecycleObserver] accepting external traffic while started.
pub trait Server: LifecycleObserver {
    /// Checks if the server currently accepts connections.
    fn listening(&self) -> bool;
}

/// Type-erased server [Component] class. Unlike a plain [Class], it always exposes the
/// [LifecycleObserver] and [Server] aliases.
#[derive(Clone, Debug)]
pub struct ServerClass {
    class: Class,
}

impl ServerClass {
    pub fn of<S: Server + Component>() -> Self {
        Self {
            class: Class::of::<S>()
                .with_alias::<LifecycleObserverPtr>(cast_observer::<S>)
                .with_alias::<ServerPtr>(cast_server::<S>),
        }
    }

    #[inline]
    pub fn class(&self) -> &Class {
        &self.class
    }
}

fn cast_server<S: Server + Send + Sync + 'static>(
    instance: InstanceAnyPtr,
) -> Result<Box<dyn Any>, InstanceAnyPtr> {
    instance
        .downcast::<S>()
        .map(|instance| Box::new(instance as InstancePtr<ServerPtr>) as Box<dyn Any>)
}

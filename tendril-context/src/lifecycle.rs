//! Lifecycle capability of bound values. A value takes part in coordinated start/stop only if its
//! binding registers the [LifecycleObserver] alias (see [Aliases](crate::component::Aliases)).
//! Everything else is [passive](Lifecycle::Passive).

use crate::future::{BoxFuture, FutureExt};
use crate::instance::{ErrorPtr, InstanceAnyPtr, InstancePtr};
#[cfg(test)]
use mockall::automock;
use std::any::Any;
use std::fmt::{Debug, Formatter};

pub type LifecycleObserverPtr = dyn LifecycleObserver + Send + Sync;

/// Observer of application start and stop. Both operations do nothing by default.
#[cfg_attr(test, automock)]
pub trait LifecycleObserver {
    /// Called when the application starts.
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async { Ok(()) }.boxed()
    }

    /// Called when the application stops.
    fn stop(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async { Ok(()) }.boxed()
    }
}

/// Lifecycle view of a resolved value.
#[derive(Clone)]
pub enum Lifecycle {
    Observer(InstancePtr<LifecycleObserverPtr>),
    Passive,
}

impl Debug for Lifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Observer(_) => f.write_str("Observer"),
            Lifecycle::Passive => f.write_str("Passive"),
        }
    }
}

impl Lifecycle {
    #[inline]
    pub fn is_observer(&self) -> bool {
        matches!(self, Lifecycle::Observer(_))
    }

    #[inline]
    pub fn observer(&self) -> Option<&InstancePtr<LifecycleObserverPtr>> {
        match self {
            Lifecycle::Observer(observer) => Some(observer),
            Lifecycle::Passive => None,
        }
    }
}

/// [CastFunction](crate::instance::CastFunction) for concrete observer types.
pub fn cast_observer<T: LifecycleObserver + Send + Sync + 'static>(
    instance: InstanceAnyPtr,
) -> Result<Box<dyn Any>, InstanceAnyPtr> {
    instance
        .downcast::<T>()
        .map(|instance| Box::new(instance as InstancePtr<LifecycleObserverPtr>) as Box<dyn Any>)
}

//! Pointer types shared by everything which gets bound in a [Context](crate::context::Context).

use std::any::Any;
use std::error::Error;
use std::sync::Arc;

pub type InstancePtr<T> = Arc<T>;

pub type InstanceAnyPtr = InstancePtr<dyn Any + Send + Sync + 'static>;

/// Type-erased error returned by user code, e.g. providers or lifecycle observers.
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Function casting a type-erased instance into a `Box<InstancePtr<Alias>>`, where `Alias` is
/// usually some `dyn Trait`. The boxed pointer needs to be downcast to `InstancePtr<Alias>`
/// afterwards. The original instance is returned if the cast fails.
pub type CastFunction = fn(instance: InstanceAnyPtr) -> Result<Box<dyn Any>, InstanceAnyPtr>;

/// Wraps any error into an [ErrorPtr].
pub fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

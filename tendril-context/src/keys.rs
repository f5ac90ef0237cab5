//! Binding key conventions. Keys of registered artifacts are built as `<namespace>.<name>`.

pub const COMPONENTS: &str = "components";
pub const SERVERS: &str = "servers";
pub const CONTROLLERS: &str = "controllers";
pub const LIFECYCLE_OBSERVERS: &str = "lifecycle_observers";
pub const DATASOURCES: &str = "datasources";

/// Builds a namespaced binding key.
#[inline]
pub fn binding_key(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}")
}

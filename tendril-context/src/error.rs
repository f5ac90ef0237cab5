use crate::instance::ErrorPtr;
use thiserror::Error;

/// Errors related to registering and removing bindings.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum BindingError {
    #[error("Attempted to register a duplicated binding with key: {0}")]
    DuplicateKey(String),
    #[error("Binding keys cannot be empty")]
    EmptyKey,
    #[error("Binding '{0}' has no value - use to(), to_class() or to_provider() before registering")]
    MissingValue(String),
    #[error("Cannot remove locked binding: {0}")]
    LockedBinding(String),
    #[error("Cannot find binding: {0}")]
    NotBound(String),
}

/// Errors related to resolving binding values.
#[derive(Error, Clone, Debug)]
pub enum ResolutionError {
    #[error("Cannot find binding: {0}")]
    NotBound(String),
    #[error("Value of binding '{key}' is not compatible with type: {type_name}")]
    IncompatibleValue {
        key: String,
        type_name: &'static str,
    },
    #[error("Dependency cycle detected while resolving binding: {0}")]
    DependencyCycle(String),
    #[error("Binding '{0}' cannot be resolved synchronously, since its provider is asynchronous")]
    AsyncResolution(String),
    #[error("Error providing value for binding '{key}': {error}")]
    ProviderError { key: String, error: ErrorPtr },
    #[error("Error constructing value: {0}")]
    ConstructionError(ErrorPtr),
}

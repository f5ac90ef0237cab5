//! Controller routing handling. Routing is based on gathering controller bindings from the context
//! and letting each controller add its routes.

use crate::controller::{Controller, ControllerPtr};
use axum::Router;
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::InstancePtr;
use tendril_context::tags;
use tracing::debug;

/// Resolves all [Controller]s bound in given context, in registration order.
pub fn resolve_controllers(
    context: &Context,
) -> Result<Vec<InstancePtr<ControllerPtr>>, ResolutionError> {
    context
        .find_by_tag(tags::CONTROLLER)
        .iter()
        .map(|binding| {
            debug!(key = binding.key(), "Resolving controller.");
            context.get_alias_sync::<ControllerPtr>(binding.key())
        })
        .collect()
}

/// Creates a [Router] for given server, configured by all controllers available on it.
pub fn bootstrap_router(controllers: &[InstancePtr<ControllerPtr>], server_name: &str) -> Router {
    controllers
        .iter()
        .filter(|controller| {
            controller
                .server_names()
                .map(|server_names| server_names.contains(server_name))
                .unwrap_or(true)
        })
        .fold(Router::new(), |router, controller| {
            controller.configure_router(router)
        })
}

//! Application component which mounts the [RestServer].

use crate::server::{RestServer, SERVER_NAME};
use tendril::component::ApplicationComponent;
use tendril::server::ServerClass;
use tendril_context::component::{Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;

/// Declares the [RestServer] named [SERVER_NAME]. Controllers are registered separately, since they
/// are application-specific.
pub struct RestComponent;

impl Injectable for RestComponent {}

impl Component for RestComponent {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl ApplicationComponent for RestComponent {
    fn servers(&self) -> Vec<(String, ServerClass)> {
        vec![(SERVER_NAME.to_string(), ServerClass::of::<RestServer>())]
    }
}

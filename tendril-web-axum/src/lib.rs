//! REST server based on [Tendril](tendril) and axum.
//!
//! `axum` is a web application framework built with an imperative approach - integration with
//! *Tendril* allows for creating handlers grouped in [*Controllers*](controller::Controller), which
//! are regular components able to use other values from the context. The
//! [RestServer](server::RestServer) takes part in the application lifecycle: it starts accepting
//! requests after all other lifecycle observers have started and stops before they do.
//!
//! ### Simple usage example
//!
//! ```no_run
//! use tendril::application;
//! use tendril_context::component::{Aliases, Component, Injectable};
//! use tendril_context::context::Context;
//! use tendril_context::error::ResolutionError;
//! use tendril_web_axum::axum::routing::get;
//! use tendril_web_axum::axum::Router;
//! use tendril_web_axum::component::RestComponent;
//! use tendril_web_axum::controller::{Controller, ControllerAliases};
//!
//! // create a struct which will serve as our Controller - this implies it
//! // needs to be a Component
//! struct ExampleController;
//!
//! // expose the controller alias, so the server can find it
//! impl Injectable for ExampleController {
//!     fn aliases(aliases: &mut Aliases) {
//!         aliases.controller::<Self>();
//!     }
//! }
//!
//! impl Component for ExampleController {
//!     fn create(_context: &Context) -> Result<Self, ResolutionError> {
//!         Ok(Self)
//!     }
//! }
//!
//! impl Controller for ExampleController {
//!     // respond to GET request for http://localhost/ (or any network interface)
//!     fn configure_router(&self, router: Router) -> Router {
//!         router.route("/", get(|| async { "Hello world!" }))
//!     }
//! }
//!
//! // note: for the sake of simplicity, errors are unwrapped, rather than
//! // gracefully handled
//! #[tokio::main]
//! async fn main() {
//!     let mut application =
//!         application::create_default().expect("unable to create application");
//!
//!     application
//!         .component::<RestComponent>(None)
//!         .expect("unable to mount server");
//!     application
//!         .controller::<ExampleController>(None)
//!         .expect("unable to register controller");
//!
//!     // run our server with default configuration until Ctrl-C is pressed
//!     application.run().await.expect("error running application");
//! }
//! ```

pub mod component;
pub mod config;
pub mod controller;
pub mod router;
pub mod server;

pub use axum;

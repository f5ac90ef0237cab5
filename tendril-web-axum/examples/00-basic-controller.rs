use tendril::application;
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_web_axum::axum::routing::get;
use tendril_web_axum::axum::Router;
use tendril_web_axum::component::RestComponent;
use tendril_web_axum::controller::{Controller, ControllerAliases};

// create a struct which will serve as our Controller - this implies it needs to be a Component
struct ExampleController;

// the controller alias lets the server find our controller
impl Injectable for ExampleController {
    fn aliases(aliases: &mut Aliases) {
        aliases.controller::<Self>();
    }
}

impl Component for ExampleController {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl Controller for ExampleController {
    fn configure_router(&self, router: Router) -> Router {
        // this handler will respond to GET request for http://localhost/ (or any network
        // interface)
        router.route("/", get(|| async { "Hello world!" }))
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
#[tokio::main]
async fn main() {
    let mut application = application::create_default().expect("unable to create application");

    // the rest component registers the server, which will be started with the application
    application
        .component::<RestComponent>(None)
        .expect("unable to mount rest component");
    application
        .controller::<ExampleController>(None)
        .expect("unable to register controller");

    // run our server with default configuration - requests should be forwarded to
    // ExampleController
    application.run().await.expect("error running application");
}

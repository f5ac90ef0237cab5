// note: this example assumes you've analyzed the previous ones

use tendril::application;
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_web_axum::axum::routing::get;
use tendril_web_axum::axum::Router;
use tendril_web_axum::component::RestComponent;
use tendril_web_axum::controller::{Controller, ControllerAliases};
use tower_http::compression::CompressionLayer;
use tower_http::validate_request::ValidateRequestHeaderLayer;

struct ExampleController;

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
    // controllers receive the router configured by previously registered controllers, so they can
    // add layers to their own routes or to everything registered so far
    fn configure_router(&self, router: Router) -> Router {
        let secured = Router::new()
            .route("/", get(|| async { "Hello world!" }))
            .route_layer(ValidateRequestHeaderLayer::bearer("password"));

        router.merge(secured).layer(CompressionLayer::new())
    }
}

#[tokio::main]
async fn main() {
    let mut application = application::create_default().expect("unable to create application");
    application
        .component::<RestComponent>(None)
        .expect("unable to mount rest component");
    application
        .controller::<ExampleController>(None)
        .expect("unable to register controller");

    application.run().await.expect("error running application");
}

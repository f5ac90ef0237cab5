// note: this example assumes you've analyzed the previous one

use fxhash::FxHashSet;
use tendril::application;
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_web_axum::axum::routing::get;
use tendril_web_axum::axum::Router;
use tendril_web_axum::component::RestComponent;
use tendril_web_axum::config::{RestConfig, ServerConfig, CONFIG_KEY};
use tendril_web_axum::controller::{Controller, ControllerAliases};

macro_rules! controller {
    ($name:ident, $server:literal, $message:literal) => {
        struct $name;

        impl Injectable for $name {
            fn aliases(aliases: &mut Aliases) {
                aliases.controller::<Self>();
            }
        }

        impl Component for $name {
            fn create(_context: &Context) -> Result<Self, ResolutionError> {
                Ok(Self)
            }
        }

        impl Controller for $name {
            fn configure_router(&self, router: Router) -> Router {
                router.route("/", get(|| async { $message }))
            }

            // assign controller to a single server
            fn server_names(&self) -> Option<FxHashSet<String>> {
                Some([$server.to_string()].into_iter().collect())
            }
        }
    };
}

controller!(ExampleController1, "1", "Hello world 1!");
controller!(ExampleController2, "2", "Hello world 2!");

#[tokio::main]
async fn main() {
    let mut application = application::create_default().expect("unable to create application");

    // the easiest way to create multiple server instances is to use the configuration file, but
    // for the sake of example, the config is bound directly
    let mut config = RestConfig::default();

    // start with a default server config and override what's needed
    let mut server_1_config = ServerConfig::default();

    // listen only on localhost interface, port 80
    server_1_config.listen_address = "127.0.0.1:80".to_string();

    let mut server_2_config = ServerConfig::default();

    // listen only on localhost interface, port 8080
    server_2_config.listen_address = "127.0.0.1:8080".to_string();

    // define 2 server instances
    config.servers = [
        ("1".to_string(), server_1_config),
        ("2".to_string(), server_2_config),
    ]
    .into_iter()
    .collect();

    application
        .context_mut()
        .bind(CONFIG_KEY)
        .to(config)
        .register()
        .expect("unable to bind config");

    application
        .component::<RestComponent>(None)
        .expect("unable to mount rest component");
    application
        .controller::<ExampleController1>(None)
        .expect("unable to register controller");
    application
        .controller::<ExampleController2>(None)
        .expect("unable to register controller");

    // http://localhost:80 will respond with "Hello world 1!"
    // http://localhost:8080 will respond with "Hello world 2!"
    application.run().await.expect("error running application");
}

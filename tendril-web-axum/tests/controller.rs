use portpicker::pick_unused_port;
use tendril::application::Application;
use tendril::server::Server;
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::InstancePtr;
use tendril_web_axum::axum::extract::Path;
use tendril_web_axum::axum::routing::{get, post};
use tendril_web_axum::axum::Router;
use tendril_web_axum::component::RestComponent;
use tendril_web_axum::config::{RestConfig, CONFIG_KEY};
use tendril_web_axum::controller::{Controller, ControllerAliases};
use tendril_web_axum::server::{RestServer, SERVER_NAME};

struct Greeting(String);

impl Injectable for Greeting {}

struct TestController {
    greeting: InstancePtr<Greeting>,
}

impl Injectable for TestController {
    fn aliases(aliases: &mut Aliases) {
        aliases.controller::<Self>();
    }
}

impl Component for TestController {
    fn create(context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self {
            greeting: context.get_sync("greeting")?,
        })
    }
}

impl Controller for TestController {
    fn configure_router(&self, router: Router) -> Router {
        let greeting = self.greeting.clone();

        router
            .route(
                "/test/:user_id",
                get(move |Path(user_id): Path<u32>| async move {
                    format!("{} {user_id}", greeting.0)
                }),
            )
            .route("/test", post(|| async { "Posted!" }))
    }
}

#[tokio::test]
async fn should_serve_controller_routes() {
    let address = format!("127.0.0.1:{}", pick_unused_port().unwrap());

    let mut application = Application::default();
    let context = application.context_mut();
    context
        .bind(CONFIG_KEY)
        .to(RestConfig::with_listen_address(address.clone()))
        .register()
        .unwrap();
    context
        .bind("greeting")
        .to(Greeting("Hello".to_string()))
        .register()
        .unwrap();

    application.component::<RestComponent>(None).unwrap();
    application.controller::<TestController>(None).unwrap();

    application.start().await.unwrap();

    let server = application
        .context()
        .get::<RestServer>(&format!("servers.{SERVER_NAME}"))
        .await
        .unwrap();
    assert_eq!(server.local_addresses().len(), 1);

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{address}/test/42"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(response, "Hello 42");

    let response = client
        .post(format!("http://{address}/test"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(response, "Posted!");

    application.stop().await.unwrap();
    assert!(!server.listening());
}

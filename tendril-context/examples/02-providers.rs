// note: this example assumes you've analyzed the previous ones

use tendril_context::component::Injectable;
use tendril_context::context::Context;
use tendril_context::future::{BoxFuture, FutureExt};
use tendril_context::instance::{convert_error, ErrorPtr};
use tendril_context::provider::Provider;
use tendril_context::scope::BindingScope;

struct Connection {
    url: String,
}

impl Injectable for Connection {}

// providers create values asynchronously, e.g. when some setup is needed
struct ConnectionProvider;

impl Provider for ConnectionProvider {
    type Value = Connection;

    fn value<'a>(&'a self, context: &'a Context) -> BoxFuture<'a, Result<Connection, ErrorPtr>> {
        async {
            let url = context
                .get::<String>("url")
                .await
                .map_err(convert_error)?;

            // pretend to connect
            tokio::task::yield_now().await;

            Ok(Connection {
                url: url.to_string(),
            })
        }
        .boxed()
    }
}

#[tokio::main]
async fn main() {
    let mut context = Context::new();
    context
        .bind("url")
        .to("postgres://localhost".to_string())
        .register()
        .expect("error binding url");
    context
        .bind("connection")
        .to_provider(ConnectionProvider)
        .in_scope(BindingScope::Singleton)
        .register()
        .expect("error binding connection");

    // asynchronous providers cannot be resolved synchronously, unless already cached
    assert!(context.get_sync::<Connection>("connection").is_err());

    let connection = context
        .get::<Connection>("connection")
        .await
        .expect("error resolving connection");

    // prints "Connected to postgres://localhost"
    println!("Connected to {}", connection.url);
}

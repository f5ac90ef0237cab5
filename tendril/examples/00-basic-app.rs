use tendril::application;
use tendril::future::{BoxFuture, FutureExt};
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::ErrorPtr;
use tendril_context::lifecycle::LifecycleObserver;

// this is a lifecycle observer, which will be started along with the application and stopped when
// the application shuts down
struct HelloWorldObserver;

// registering the lifecycle observer alias is what makes the application notice start/stop
impl Injectable for HelloWorldObserver {
    fn aliases(aliases: &mut Aliases) {
        aliases.lifecycle_observer::<Self>();
    }
}

impl Component for HelloWorldObserver {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl LifecycleObserver for HelloWorldObserver {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Hello world!");
            Ok(())
        }
        .boxed()
    }

    fn stop(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Goodbye world!");
            Ok(())
        }
        .boxed()
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
#[tokio::main]
async fn main() {
    // create our application with configuration read from the environment
    let mut application =
        application::create_default().expect("unable to create default application");

    // observers need to be registered explicitly
    application
        .lifecycle_observer::<HelloWorldObserver>(None)
        .expect("unable to register observer");

    // prints "Hello world!", waits for Ctrl-C and prints "Goodbye world!"
    application.run().await.expect("error running application");
}

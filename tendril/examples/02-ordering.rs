// note: this example assumes you've analyzed the previous ones

use tendril::application::Application;
use tendril::component::ApplicationComponent;
use tendril::future::{BoxFuture, FutureExt};
use tendril::server::{Server, ServerClass};
use tendril_context::component::{Aliases, Class, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::ErrorPtr;
use tendril_context::lifecycle::LifecycleObserver;

// a piece of infrastructure, which needs to be ready before any requests are accepted
struct ConnectionPool;

impl Injectable for ConnectionPool {}

impl Component for ConnectionPool {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl LifecycleObserver for ConnectionPool {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Connection pool ready.");
            Ok(())
        }
        .boxed()
    }

    fn stop(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Connection pool closed.");
            Ok(())
        }
        .boxed()
    }
}

// servers accept external traffic, so they are always started after other observers and stopped
// before them
struct EchoServer;

impl Injectable for EchoServer {}

impl Component for EchoServer {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl LifecycleObserver for EchoServer {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Echo server listening.");
            Ok(())
        }
        .boxed()
    }

    fn stop(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Echo server stopped.");
            Ok(())
        }
        .boxed()
    }
}

impl Server for EchoServer {
    fn listening(&self) -> bool {
        true
    }
}

// components bundle related parts, so they can be registered together
struct EchoComponent;

impl Injectable for EchoComponent {}

impl Component for EchoComponent {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl ApplicationComponent for EchoComponent {
    fn servers(&self) -> Vec<(String, ServerClass)> {
        // servers are ordered by their names
        vec![("echo".to_string(), ServerClass::of::<EchoServer>())]
    }

    fn lifecycle_observers(&self) -> Vec<Class> {
        vec![Class::observer::<ConnectionPool>()]
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
#[tokio::main]
async fn main() {
    let mut application = Application::default();
    application
        .component::<EchoComponent>(None)
        .expect("unable to mount component");

    // prints "Connection pool ready." followed by "Echo server listening."
    application.start().await.expect("error starting application");

    // prints "Echo server stopped." followed by "Connection pool closed."
    application.stop().await.expect("error stopping application");
}

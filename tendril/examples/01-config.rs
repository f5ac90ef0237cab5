// note: this example assumes you've analyzed the previous one

use tendril::application::Application;
use tendril::config::{ApplicationConfig, CONFIG_KEY};
use tendril::future::{BoxFuture, FutureExt};
use tendril_context::component::{Aliases, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{ErrorPtr, InstancePtr};
use tendril_context::lifecycle::LifecycleObserver;

// this simple observer will print a part of application config to prove everything works
struct ConfigPrinter {
    config: InstancePtr<ApplicationConfig>,
}

impl Injectable for ConfigPrinter {
    fn aliases(aliases: &mut Aliases) {
        aliases.lifecycle_observer::<Self>();
    }
}

impl Component for ConfigPrinter {
    fn create(context: &Context) -> Result<Self, ResolutionError> {
        // application config is always bound under the same key
        Ok(Self {
            config: context.get_sync(CONFIG_KEY)?,
        })
    }
}

impl LifecycleObserver for ConfigPrinter {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            println!("Using built-in logger: {}", self.config.install_tracing_logger);
            Ok(())
        }
        .boxed()
    }
}

#[tokio::main]
async fn main() {
    // by default, config is read from the environment (see module documentation); to provide your
    // own, start with a default config and override what's needed
    let mut config = ApplicationConfig::default();
    config.install_tracing_logger = false;

    let mut application =
        Application::with_config(config).expect("unable to create application");
    application
        .lifecycle_observer::<ConfigPrinter>(None)
        .expect("unable to register observer");

    // prints "Using built-in logger: false"
    application.start().await.expect("error starting application");
    application.stop().await.expect("error stopping application");
}

//! Core application framework functionality.

use crate::component::ApplicationComponent;
use crate::config::{ApplicationConfig, CONFIG_KEY};
use crate::server::{Server, ServerClass};
use derive_more::Constructor;
use itertools::Itertools;
use std::future::Future;
use tendril_context::binding::{Binding, BindingPtr};
use tendril_context::component::{Aliases, Class, Component};
use tendril_context::context::Context;
use tendril_context::error::{BindingError, ResolutionError};
use tendril_context::filter::{with_any_tag, with_shared_scope};
use tendril_context::instance::{convert_error, ErrorPtr};
use tendril_context::keys::{binding_key, COMPONENTS, CONTROLLERS, LIFECYCLE_OBSERVERS, SERVERS};
use tendril_context::lifecycle::{Lifecycle, LifecycleObserver};
use tendril_context::scope::BindingScope;
use tendril_context::tags;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LIFECYCLE_TAGS: &[&str] = &[tags::LIFECYCLE_OBSERVER, tags::SERVER];

#[derive(Clone, Error, Debug)]
pub enum ApplicationError {
    #[error("Error registering binding: {0}")]
    BindingError(#[from] BindingError),
    #[error("Error resolving binding: {0}")]
    ResolutionError(#[from] ResolutionError),
    #[error("Lifecycle observer error: {0}")]
    LifecycleError(ErrorPtr),
    #[error("Error reading configuration: {0}")]
    ConfigError(ErrorPtr),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LifecycleEvent {
    Start,
    Stop,
}

/// Creates an [Application] configured from the environment (see [config](crate::config)),
/// installing a tracing logger if configured to do so.
pub fn create_default() -> Result<Application, ApplicationError> {
    let config = ApplicationConfig::init_from_environment()
        .map_err(|error| ApplicationError::ConfigError(convert_error(error)))?;

    if config.install_tracing_logger {
        install_tracing_logger();
    }

    Application::with_config(config)
}

fn install_tracing_logger() {
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        debug!("Not installing tracing logger: {error}");
    }
}

/// Main entrypoint for the application. Owns the [Context] with all registered bindings and drives
/// the start/stop sequence of [lifecycle observers](LifecycleObserver).
///
/// Observers are started strictly sequentially: bindings without a server tag first, then servers
/// ordered by the value of their server tag. Stopping happens in the reverse order, so servers stop
/// accepting traffic before the infrastructure they depend on goes down. The first failure aborts
/// the whole sequence - nothing is rolled back.
#[derive(Constructor)]
pub struct Application {
    context: Context,
}

impl Default for Application {
    fn default() -> Self {
        Self::new(Context::new())
    }
}

impl Application {
    /// Creates an application with the config bound in its context.
    pub fn with_config(config: ApplicationConfig) -> Result<Self, ApplicationError> {
        let mut context = Context::new();
        context.bind(CONFIG_KEY).to(config).lock().register()?;

        Ok(Self::new(context))
    }

    /// Name from the bound [ApplicationConfig], or the default one if no config is bound.
    pub fn name(&self) -> String {
        self.context
            .get_sync::<ApplicationConfig>(CONFIG_KEY)
            .map(|config| config.name.clone())
            .unwrap_or_else(|_| ApplicationConfig::default().name)
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Mounts an application component: registers the component itself as a singleton and then
    /// every artifact it declares. The component is created synchronously on mount. If no name is
    /// given, the type name converted to snake case is used. Mounting is all or nothing: on error,
    /// everything registered by it is removed again.
    pub fn component<C: ApplicationComponent>(
        &mut self,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        let class = Class::of::<C>();
        let key = binding_key(COMPONENTS, &name_or_default(name, &class));

        if self.context.contains(&key) {
            return Err(BindingError::DuplicateKey(key).into());
        }

        info!(%key, "Mounting component...");

        let component = self.context.instantiate::<C>()?;

        let mut builder = self
            .context
            .bind(&key)
            .to_class_instance(component.clone())
            .tag(tags::COMPONENT);
        if Aliases::of::<C>().is_lifecycle_observer() {
            builder = builder.tag(tags::LIFECYCLE_OBSERVER);
        }

        let binding = builder.register()?;

        let mut mounted = vec![binding.key().to_string()];
        if let Err(error) = self.mount(component.as_ref(), &mut mounted) {
            warn!(%key, %error, "Error mounting component.");
            self.unmount(&mounted);
            return Err(error);
        }

        Ok(binding)
    }

    fn mount<C: ApplicationComponent>(
        &mut self,
        component: &C,
        mounted: &mut Vec<String>,
    ) -> Result<(), ApplicationError> {
        for class in component.controllers() {
            let binding = self.controller_class(&class, None)?;
            mounted.push(binding.key().to_string());
        }

        for (key, provider) in component.providers() {
            let binding = self
                .context
                .bind(key)
                .to_provider_ptr(provider)
                .tag(tags::PROVIDER)
                .register()?;
            mounted.push(binding.key().to_string());
        }

        for (name, class) in component.servers() {
            let binding = self.server_class(&class, Some(&name))?;
            mounted.push(binding.key().to_string());
        }

        for class in component.lifecycle_observers() {
            let binding = self.lifecycle_observer_class(&class, None)?;
            mounted.push(binding.key().to_string());
        }

        Ok(())
    }

    fn unmount(&mut self, keys: &[String]) {
        for key in keys.iter().rev() {
            if let Err(error) = self.context.unbind(key) {
                warn!(%key, %error, "Cannot remove binding of a partially mounted component.");
            }
        }
    }

    /// Registers a server as a singleton tagged with its name, which orders servers during start
    /// and stop.
    pub fn server<S: Server + Component>(
        &mut self,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        self.server_class(&ServerClass::of::<S>(), name)
    }

    /// Registers a type-erased server class. See [Application::server].
    pub fn server_class(
        &mut self,
        server: &ServerClass,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        let name = name_or_default(name, server.class());

        self.context
            .bind(binding_key(SERVERS, &name))
            .to_class_of(server.class())
            .in_scope(BindingScope::Singleton)
            .tag_value(tags::SERVER, &name)
            .tag(tags::LIFECYCLE_OBSERVER)
            .register()
            .map_err(Into::into)
    }

    /// Registers multiple servers under their default names.
    pub fn servers(&mut self, servers: &[ServerClass]) -> Result<Vec<BindingPtr>, ApplicationError> {
        servers
            .iter()
            .map(|server| self.server_class(server, None))
            .try_collect()
    }

    /// Registers a controller class. Controllers are transient.
    pub fn controller<C: Component>(
        &mut self,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        self.controller_class(&Class::of::<C>(), name)
    }

    /// Registers a type-erased controller class. See [Application::controller].
    pub fn controller_class(
        &mut self,
        controller: &Class,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        let name = name_or_default(name, controller);

        self.context
            .bind(binding_key(CONTROLLERS, &name))
            .to_class_of(controller)
            .tag(tags::CONTROLLER)
            .register()
            .map_err(Into::into)
    }

    /// Registers a singleton lifecycle observer, which is not a server.
    pub fn lifecycle_observer<T: Component + LifecycleObserver>(
        &mut self,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        self.lifecycle_observer_class(&Class::observer::<T>(), name)
    }

    /// Registers a type-erased lifecycle observer class. See [Application::lifecycle_observer].
    pub fn lifecycle_observer_class(
        &mut self,
        observer: &Class,
        name: Option<&str>,
    ) -> Result<BindingPtr, ApplicationError> {
        let name = name_or_default(name, observer);

        self.context
            .bind(binding_key(LIFECYCLE_OBSERVERS, &name))
            .to_class_of(observer)
            .in_scope(BindingScope::Singleton)
            .tag(tags::LIFECYCLE_OBSERVER)
            .register()
            .map_err(Into::into)
    }

    /// Returns bindings taking part in start/stop, in start order. Only singleton and constant
    /// bindings tagged as lifecycle observers or servers are included. Bindings without a server
    /// tag come first, followed by servers sorted by the tag value. Registration order is kept for
    /// equal tags.
    pub fn observers(&self) -> Vec<BindingPtr> {
        let participates = with_any_tag(LIFECYCLE_TAGS);

        self.context
            .find(|binding| with_shared_scope(binding) && participates(binding))
            .into_iter()
            .sorted_by(|first, second| server_order(first).cmp(server_order(second)))
            .collect()
    }

    /// Starts all observers, one by one. See [Application] for ordering and failure semantics.
    pub async fn start(&self) -> Result<(), ApplicationError> {
        info!(name = %self.name(), "Starting application...");

        for binding in self.observers() {
            self.notify(&binding, LifecycleEvent::Start).await?;
        }

        info!("Application started.");
        Ok(())
    }

    /// Stops all observers in reverse start order.
    pub async fn stop(&self) -> Result<(), ApplicationError> {
        info!(name = %self.name(), "Stopping application...");

        for binding in self.observers().iter().rev() {
            self.notify(binding, LifecycleEvent::Stop).await?;
        }

        info!("Application stopped.");
        Ok(())
    }

    /// Starts the application, waits for given signal and stops the application. Nothing is
    /// stopped if starting fails.
    pub async fn run_until<F: Future<Output = ()>>(&self, signal: F) -> Result<(), ApplicationError> {
        self.start().await?;

        info!("Waiting for shutdown signal...");
        signal.await;

        self.stop().await
    }

    /// Runs the application until Ctrl-C is received.
    pub async fn run(&self) -> Result<(), ApplicationError> {
        self.run_until(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for shutdown signal: {error}");
            }
        })
        .await
    }

    async fn notify(&self, binding: &Binding, event: LifecycleEvent) -> Result<(), ApplicationError> {
        let Lifecycle::Observer(observer) = self.context.lifecycle(binding).await? else {
            debug!(key = binding.key(), "Skipping passive binding.");
            return Ok(());
        };

        debug!(key = binding.key(), ?event, "Notifying lifecycle observer.");

        match event {
            LifecycleEvent::Start => observer.start().await,
            LifecycleEvent::Stop => observer.stop().await,
        }
        .map_err(ApplicationError::LifecycleError)
    }
}

fn server_order(binding: &Binding) -> &str {
    binding.tag(tags::SERVER).unwrap_or_default()
}

fn name_or_default(name: Option<&str>, class: &Class) -> String {
    name.map(str::to_string)
        .unwrap_or_else(|| class.default_name())
}

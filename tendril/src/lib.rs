//! Application lifecycle coordination based on the [tendril_context] binding registry.
//!
//! Applications are assembled from loosely coupled parts: caches, connection managers, servers and
//! so on. Some of them need to be started before the application can serve requests, and stopped
//! when it shuts down. This crate provides the [Application](application::Application), which owns
//! the registry, mounts [components](component::ApplicationComponent) and drives the start/stop
//! sequence of all registered [lifecycle observers](tendril_context::lifecycle::LifecycleObserver)
//! in a deterministic order: infrastructure first, [servers](server::Server) last when starting,
//! and the reverse when stopping. It also configures supporting infrastructure, e.g. logging.
//!
//! ```
//! use tendril::application::Application;
//! use tendril_context::component::{Aliases, Component, Injectable};
//! use tendril_context::context::Context;
//! use tendril_context::error::ResolutionError;
//! use tendril_context::lifecycle::LifecycleObserver;
//!
//! struct Cache;
//!
//! impl Injectable for Cache {
//!     fn aliases(aliases: &mut Aliases) {
//!         aliases.lifecycle_observer::<Self>();
//!     }
//! }
//!
//! impl Component for Cache {
//!     fn create(_context: &Context) -> Result<Self, ResolutionError> {
//!         Ok(Self)
//!     }
//! }
//!
//! impl LifecycleObserver for Cache {}
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut application = Application::default();
//!     application.lifecycle_observer::<Cache>(None).unwrap();
//!
//!     application.start().await.unwrap();
//!     application.stop().await.unwrap();
//! }
//! ```

pub mod application;
pub mod component;
pub mod config;
pub mod server;

pub use tendril_context::future;

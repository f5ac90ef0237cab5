//! Binding registry for applications built from loosely coupled parts.
//!
//! A [Context](context::Context) holds named [Bindings](binding::Binding), each associating a key
//! with a value source (a constant, a [Component](component::Component) class or an asynchronous
//! [Provider](provider::Provider)), a [scope](scope::BindingScope) and a set of
//! [tags](tags). Bindings are discovered by tags via typed [filters](filter) and resolved into
//! values on request.
//!
//! Values might expose trait-object views called [Aliases](component::Aliases). The
//! [LifecycleObserver](lifecycle::LifecycleObserver) alias marks values which should be started
//! and stopped together with the application owning the context.
//!
//! ```
//! use tendril_context::context::Context;
//! use tendril_context::scope::BindingScope;
//! use tendril_context::tags;
//!
//! let mut context = Context::new();
//! context
//!     .bind("greeting")
//!     .to("Hello world!".to_string())
//!     .tag(tags::COMPONENT)
//!     .register()
//!     .unwrap();
//!
//! let greeting = context.get_sync::<String>("greeting").unwrap();
//! assert_eq!(greeting.as_str(), "Hello world!");
//! assert_eq!(context.find_by_tag(tags::COMPONENT).len(), 1);
//! assert_eq!(
//!     context.binding("greeting").unwrap().scope(),
//!     BindingScope::Constant
//! );
//! ```

pub mod binding;
pub mod component;
pub mod context;
pub mod error;
pub mod filter;
pub mod future;
pub mod instance;
pub mod keys;
pub mod lifecycle;
pub mod provider;
pub mod scope;
pub mod tags;

//! Core server-related functionality.

use crate::config::RestConfig;
use crate::controller::ControllerPtr;
use crate::router::{bootstrap_router, resolve_controllers};
use hyper::server::conn::AddrIncoming;
use hyper::server::Builder;
use hyper::Error as HyperError;
use itertools::Itertools;
use std::net::{AddrParseError, SocketAddr};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tendril::future::{BoxFuture, FutureExt};
use tendril::server::Server;
use tendril_context::component::{Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{convert_error, ErrorPtr, InstancePtr};
use tendril_context::lifecycle::LifecycleObserver;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

/// Name under which [RestServer] is registered by [RestComponent](crate::component::RestComponent).
pub const SERVER_NAME: &str = "rest";

/// Errors related to running servers.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Error parsing listen address: {0}")]
    ListenAddressParseError(#[from] AddrParseError),
    #[error("Error binding server: {0}")]
    BindError(#[source] HyperError),
    #[error("Server is already running")]
    AlreadyRunning,
    #[error("Error serving requests: {0}")]
    ServeError(#[source] HyperError),
    #[error("Server task failed: {0}")]
    TaskError(#[source] JoinError),
}

struct RunningServer {
    name: String,
    local_address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), HyperError>>,
}

/// REST [Server] serving routes of all [Controllers](crate::controller::Controller) bound in the
/// context. One listener is created per server entry in [RestConfig]. Starting binds all listen
/// addresses and serves requests in background tasks, while stopping shuts them down gracefully.
pub struct RestServer {
    config: InstancePtr<RestConfig>,
    controllers: Vec<InstancePtr<ControllerPtr>>,
    running: Mutex<Vec<RunningServer>>,
}

impl Injectable for RestServer {}

impl Component for RestServer {
    fn create(context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self::new(
            RestConfig::resolve(context)?,
            resolve_controllers(context)?,
        ))
    }
}

impl LifecycleObserver for RestServer {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async { self.start_servers().map_err(convert_error) }.boxed()
    }

    fn stop(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async { self.stop_servers().await.map_err(convert_error) }.boxed()
    }
}

impl Server for RestServer {
    fn listening(&self) -> bool {
        !self.running().is_empty()
    }
}

impl RestServer {
    pub fn new(config: InstancePtr<RestConfig>, controllers: Vec<InstancePtr<ControllerPtr>>) -> Self {
        Self {
            config,
            controllers,
            running: Default::default(),
        }
    }

    /// Addresses of currently running listeners, by server name.
    pub fn local_addresses(&self) -> Vec<(String, SocketAddr)> {
        self.running()
            .iter()
            .map(|server| (server.name.clone(), server.local_address))
            .collect()
    }

    fn running(&self) -> MutexGuard<'_, Vec<RunningServer>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_servers(&self) -> Result<(), ServerError> {
        let mut running = self.running();
        if !running.is_empty() {
            return Err(ServerError::AlreadyRunning);
        }

        // bind everything first, so nothing is left running on error
        let builders = self
            .config
            .servers
            .iter()
            .sorted_by(|(first, _), (second, _)| first.cmp(second))
            .map(|(name, config)| {
                bind(&config.listen_address).map(|builder| (name.clone(), builder))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (name, builder) in builders {
            let router = bootstrap_router(&self.controllers, &name);
            let server = builder.serve(router.into_make_service());
            let local_address = server.local_addr();

            let (shutdown, receiver) = oneshot::channel();
            let handle = tokio::spawn(server.with_graceful_shutdown(async move {
                // a dropped sender also means shutdown
                let _ = receiver.await;
            }));

            info!(name = %name, %local_address, "Server listening.");

            running.push(RunningServer {
                name,
                local_address,
                shutdown,
                handle,
            });
        }

        Ok(())
    }

    async fn stop_servers(&self) -> Result<(), ServerError> {
        let servers = std::mem::take(&mut *self.running());

        // signal everything first, so servers shut down in parallel
        let handles = servers
            .into_iter()
            .map(|server| {
                debug!(name = %server.name, "Shutting down server...");

                // the server task might have already finished on its own
                let _ = server.shutdown.send(());
                (server.name, server.handle)
            })
            .collect_vec();

        let mut result = Ok(());
        for (name, handle) in handles {
            match handle
                .await
                .map_err(ServerError::TaskError)
                .and_then(|served| served.map_err(ServerError::ServeError))
            {
                Ok(()) => info!(name = %name, "Server stopped."),
                Err(error) => {
                    error!(name = %name, %error, "Error stopping server.");
                    if result.is_ok() {
                        result = Err(error);
                    }
                }
            }
        }

        result
    }
}

fn bind(listen_address: &str) -> Result<Builder<AddrIncoming>, ServerError> {
    axum::Server::try_bind(&listen_address.parse()?).map_err(ServerError::BindError)
}

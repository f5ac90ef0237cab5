//! Server configuration is represented by [RestConfig]. If a [RestConfig] is bound in the
//! application context under [CONFIG_KEY], it is used as-is.
//!
//! Otherwise, the config is created with opinionated default values, which can then be overwritten
//! by values from `tendril.json` file under the `rest` key.

use config::{Config, ConfigError, File};
use fxhash::FxHashMap;
use serde::Deserialize;
use tendril::config::CONFIG_FILE;
use tendril_context::component::Injectable;
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{convert_error, InstancePtr};

/// Name of the server created by default.
pub const DEFAULT_SERVER_NAME: &str = "default";

/// Key of an optional [RestConfig] binding.
pub const CONFIG_KEY: &str = "rest.config";

/// Configuration of a single listening server.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Address on which to listen.
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:80".to_string(),
        }
    }
}

/// REST server configuration.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RestConfig {
    /// Map from server name to their config. Typically, only one server with one address will be
    /// present, but in case multiple servers are desired, they should be specified here.
    pub servers: FxHashMap<String, ServerConfig>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            servers: [(DEFAULT_SERVER_NAME.to_string(), Default::default())]
                .into_iter()
                .collect(),
        }
    }
}

impl From<OptionalRestConfig> for RestConfig {
    fn from(value: OptionalRestConfig) -> Self {
        let default = Self::default();
        Self {
            servers: value.servers.unwrap_or(default.servers),
        }
    }
}

impl Injectable for RestConfig {}

impl RestConfig {
    /// Creates a config with a single default server listening on given address.
    pub fn with_listen_address(listen_address: impl Into<String>) -> Self {
        Self {
            servers: [(
                DEFAULT_SERVER_NAME.to_string(),
                ServerConfig {
                    listen_address: listen_address.into(),
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    /// Reads the config from the default config file.
    pub fn init_from_config() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalRestConfigWrapper>())
            .map(|config| config.rest.map(|config| config.into()).unwrap_or_default())
    }

    /// Returns the config bound in the context, or reads it from the config file.
    pub fn resolve(context: &Context) -> Result<InstancePtr<Self>, ResolutionError> {
        if context.contains(CONFIG_KEY) {
            return context.get_sync(CONFIG_KEY);
        }

        Self::init_from_config()
            .map(InstancePtr::new)
            .map_err(|error| ResolutionError::ConstructionError(convert_error(error)))
    }
}

#[derive(Deserialize)]
struct OptionalRestConfig {
    servers: Option<FxHashMap<String, ServerConfig>>,
}

#[derive(Deserialize)]
struct OptionalRestConfigWrapper {
    rest: Option<OptionalRestConfig>,
}

//! Framework configuration is represented by [ApplicationConfig], which is bound in the application
//! context under [CONFIG_KEY], so it can be used by any other component.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `TENDRIL_` or `tendril.json` file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "TENDRIL";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "tendril.json";

/// Key of the [ApplicationConfig] binding.
pub const CONFIG_KEY: &str = "application.config";

/// Framework configuration.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    /// Application name, used for diagnostics.
    pub name: String,
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "application".to_string(),
            install_tracing_logger: true,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            name: value.name.unwrap_or(default.name),
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
        }
    }
}

impl ApplicationConfig {
    /// Reads the config from the default config file and the environment.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

impl tendril_context::component::Injectable for ApplicationConfig {}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    name: Option<String>,
    install_tracing_logger: Option<bool>,
}

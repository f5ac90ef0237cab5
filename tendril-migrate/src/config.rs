//! Migration configuration is represented by [MigrationConfig]. If a [MigrationConfig] is bound in
//! the application context under [CONFIG_KEY], it is used as-is.
//!
//! Otherwise, the config is created with opinionated default values, which can then be overwritten
//! by values from `tendril.json` file under the `migration` key.

use config::{Config, ConfigError, File};
use serde::Deserialize;
use tendril::config::CONFIG_FILE;
use tendril_context::component::Injectable;
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{convert_error, InstancePtr};

/// Key of an optional [MigrationConfig] binding.
pub const CONFIG_KEY: &str = "migration.config";

/// What to do with schema which already exists.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingSchema {
    /// Alter existing schema, keeping the data.
    #[default]
    Alter,
    /// Drop existing schema along with all data.
    Drop,
}

/// Migration configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Should migrations run on application start.
    pub run_migrations_on_start: bool,
    /// How to treat existing schema.
    pub existing_schema: ExistingSchema,
    /// Models to migrate. All models are migrated if not present.
    pub models: Option<Vec<String>>,
}

impl Injectable for MigrationConfig {}

impl MigrationConfig {
    /// Reads the config from the default config file.
    pub fn init_from_config() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .build()
            .and_then(|config| config.try_deserialize::<MigrationConfigWrapper>())
            .map(|config| config.migration)
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

#[derive(Deserialize, Default)]
#[serde(default)]
struct MigrationConfigWrapper {
    migration: MigrationConfig,
}

//! Module related to running schema migrations.

use crate::config::{ExistingSchema, MigrationConfig};
use crate::datasource::DataSourcePtr;
use itertools::Itertools;
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{ErrorPtr, InstancePtr};
use tendril_context::tags;
use thiserror::Error;
use tracing::{debug, info};

/// Errors related to migrating schema.
#[derive(Error, Clone, Debug)]
pub enum MigrationError {
    #[error("Error resolving data source: {0}")]
    ResolutionError(#[from] ResolutionError),
    #[error("Error migrating data source '{key}': {error}")]
    DataSourceError { key: String, error: ErrorPtr },
}

/// Options for a single migration run.
#[derive(Clone, Debug, Default)]
pub struct SchemaMigrationOptions {
    pub existing_schema: ExistingSchema,
    /// Models to migrate. All models are migrated if not present.
    pub models: Option<Vec<String>>,
}

impl From<&MigrationConfig> for SchemaMigrationOptions {
    fn from(config: &MigrationConfig) -> Self {
        Self {
            existing_schema: config.existing_schema,
            models: config.models.clone(),
        }
    }
}

/// A resolved data source with its binding key.
pub type DataSourceEntry = (String, InstancePtr<DataSourcePtr>);

/// Resolves all data sources bound in given context, in registration order.
pub async fn resolve_data_sources(
    context: &Context,
) -> Result<Vec<DataSourceEntry>, ResolutionError> {
    let mut result = vec![];
    for binding in context.find_by_tag(tags::DATASOURCE) {
        let data_source = context.get_alias::<DataSourcePtr>(binding.key()).await?;
        result.push((binding.key().to_string(), data_source));
    }

    Ok(result)
}

/// Synchronous version of [resolve_data_sources].
pub fn resolve_data_sources_sync(
    context: &Context,
) -> Result<Vec<DataSourceEntry>, ResolutionError> {
    context
        .find_by_tag(tags::DATASOURCE)
        .iter()
        .map(|binding| {
            context
                .get_alias_sync::<DataSourcePtr>(binding.key())
                .map(|data_source| (binding.key().to_string(), data_source))
        })
        .collect()
}

/// Migrates schema of all data sources bound in given context. Data sources are migrated one by
/// one, in registration order, and the first failure stops the whole process.
pub async fn migrate_schema(
    context: &Context,
    options: &SchemaMigrationOptions,
) -> Result<(), MigrationError> {
    let data_sources = resolve_data_sources(context).await?;
    migrate_data_sources(&data_sources, options).await
}

/// Migrates schema of given data sources. See [migrate_schema].
pub async fn migrate_data_sources(
    data_sources: &[DataSourceEntry],
    options: &SchemaMigrationOptions,
) -> Result<(), MigrationError> {
    if data_sources.is_empty() {
        info!("Not running any migrations, since no data sources are available.");
        return Ok(());
    }

    info!(
        existing_schema = ?options.existing_schema,
        data_sources = %data_sources.iter().map(|(key, _)| key).join(", "),
        "Migrating {} data sources...",
        data_sources.len()
    );

    let models = options.models.as_deref();
    for (key, data_source) in data_sources {
        debug!(%key, "Migrating data source.");

        match options.existing_schema {
            ExistingSchema::Drop => data_source.automigrate(models).await,
            ExistingSchema::Alter => data_source.autoupdate(models).await,
        }
        .map_err(|error| MigrationError::DataSourceError {
            key: key.clone(),
            error,
        })?;
    }

    debug!("Done migrating schema.");

    Ok(())
}

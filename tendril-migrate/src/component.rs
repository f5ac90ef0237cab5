//! Running migrations on application start.

use crate::config::MigrationConfig;
use crate::migration::{
    migrate_data_sources, resolve_data_sources_sync, DataSourceEntry, SchemaMigrationOptions,
};
use tendril::component::ApplicationComponent;
use tendril::future::{BoxFuture, FutureExt};
use tendril_context::component::{Class, Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::{convert_error, ErrorPtr, InstancePtr};
use tendril_context::lifecycle::LifecycleObserver;
use tracing::info;

/// Lifecycle observer migrating all data sources on start, if enabled by [MigrationConfig]. Data
/// sources are resolved when the migrator is created, so they need to be registered before the
/// application starts.
pub struct SchemaMigrator {
    config: InstancePtr<MigrationConfig>,
    data_sources: Vec<DataSourceEntry>,
}

impl Injectable for SchemaMigrator {}

impl Component for SchemaMigrator {
    fn create(context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self {
            config: MigrationConfig::resolve(context)?,
            data_sources: resolve_data_sources_sync(context)?,
        })
    }
}

impl LifecycleObserver for SchemaMigrator {
    fn start(&self) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        async {
            if !self.config.run_migrations_on_start {
                info!("Migrations on start are disabled.");
                return Ok(());
            }

            let options = SchemaMigrationOptions::from(self.config.as_ref());
            migrate_data_sources(&self.data_sources, &options)
                .await
                .map_err(convert_error)
        }
        .boxed()
    }
}

/// Declares the [SchemaMigrator]. Mount it after registering data sources, so that migrations run
/// after data sources which are lifecycle observers themselves have started.
pub struct MigrationComponent;

impl Injectable for MigrationComponent {}

impl Component for MigrationComponent {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self)
    }
}

impl ApplicationComponent for MigrationComponent {
    fn lifecycle_observers(&self) -> Vec<Class> {
        vec![Class::observer::<SchemaMigrator>()]
    }
}

//! Migration-related extensions of the [Application].

use crate::datasource::{cast_data_source, DataSourcePtr, MigratableDataSource};
use crate::migration::{migrate_schema, MigrationError, SchemaMigrationOptions};
use tendril::application::{Application, ApplicationError};
use tendril::future::{BoxFuture, FutureExt};
use tendril_context::binding::BindingPtr;
use tendril_context::component::{Component, Injectable};
use tendril_context::keys::{binding_key, DATASOURCES};
use tendril_context::scope::BindingScope;
use tendril_context::tags;

/// Registration of data sources and running migrations on an [Application].
pub trait MigrationApplication {
    /// Registers a data source instance under `datasources.<name>`.
    fn data_source<T: MigratableDataSource + Injectable>(
        &mut self,
        name: &str,
        data_source: T,
    ) -> Result<BindingPtr, ApplicationError>;

    /// Registers a singleton data source class under `datasources.<name>`.
    fn data_source_class<T: MigratableDataSource + Component>(
        &mut self,
        name: &str,
    ) -> Result<BindingPtr, ApplicationError>;

    /// Migrates schema of all registered data sources. See [migrate_schema].
    fn migrate_schema<'a>(
        &'a self,
        options: &'a SchemaMigrationOptions,
    ) -> BoxFuture<'a, Result<(), MigrationError>>;
}

impl MigrationApplication for Application {
    fn data_source<T: MigratableDataSource + Injectable>(
        &mut self,
        name: &str,
        data_source: T,
    ) -> Result<BindingPtr, ApplicationError> {
        self.context_mut()
            .bind(binding_key(DATASOURCES, name))
            .to(data_source)
            .alias::<DataSourcePtr>(cast_data_source::<T>)
            .tag(tags::DATASOURCE)
            .register()
            .map_err(Into::into)
    }

    fn data_source_class<T: MigratableDataSource + Component>(
        &mut self,
        name: &str,
    ) -> Result<BindingPtr, ApplicationError> {
        self.context_mut()
            .bind(binding_key(DATASOURCES, name))
            .to_class::<T>()
            .in_scope(BindingScope::Singleton)
            .alias::<DataSourcePtr>(cast_data_source::<T>)
            .tag(tags::DATASOURCE)
            .register()
            .map_err(Into::into)
    }

    fn migrate_schema<'a>(
        &'a self,
        options: &'a SchemaMigrationOptions,
    ) -> BoxFuture<'a, Result<(), MigrationError>> {
        migrate_schema(self.context(), options).boxed()
    }
}

#[cfg(test)]
mod tests {
    use crate::application::MigrationApplication;
    use crate::migration::tests::{data_source, Log};
    use tendril::application::{Application, ApplicationError};
    use tendril_context::binding::BindingType;
    use tendril_context::error::BindingError;
    use tendril_context::tags;

    #[test]
    fn should_register_tagged_data_source() {
        let log = Log::default();
        let mut application = Application::default();

        let binding = application
            .data_source("db", data_source("db", &log, false))
            .unwrap();
        assert_eq!(binding.key(), "datasources.db");
        assert_eq!(binding.binding_type(), BindingType::Constant);
        assert!(binding.has_tag(tags::DATASOURCE));

        assert!(matches!(
            application.data_source("db", data_source("db", &log, false)),
            Err(ApplicationError::BindingError(BindingError::DuplicateKey(_)))
        ));
    }
}

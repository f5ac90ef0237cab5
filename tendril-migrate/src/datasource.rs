//! Functionality related to defining data sources capable of schema migration.

use std::any::Any;
use tendril::future::BoxFuture;
use tendril_context::component::Aliases;
use tendril_context::instance::{ErrorPtr, InstanceAnyPtr, InstancePtr};

pub type DataSourcePtr = dyn MigratableDataSource + Send + Sync;

/// A data source which can create or update its schema based on known models. When `models` is
/// `None`, all models are migrated.
pub trait MigratableDataSource {
    /// Drops existing schema and creates it from scratch.
    fn automigrate(&self, models: Option<&[String]>) -> BoxFuture<'_, Result<(), ErrorPtr>>;

    /// Alters existing schema to match the models, keeping existing data.
    fn autoupdate(&self, models: Option<&[String]>) -> BoxFuture<'_, Result<(), ErrorPtr>>;
}

/// Registration of the [MigratableDataSource] alias.
pub trait DataSourceAliases {
    fn data_source<T: MigratableDataSource + Send + Sync + 'static>(&mut self) -> &mut Self;
}

impl DataSourceAliases for Aliases {
    fn data_source<T: MigratableDataSource + Send + Sync + 'static>(&mut self) -> &mut Self {
        self.register::<DataSourcePtr>(cast_data_source::<T>)
    }
}

/// Casts a type-erased instance of `T` to a [DataSourcePtr].
pub fn cast_data_source<T: MigratableDataSource + Send + Sync + 'static>(
    instance: InstanceAnyPtr,
) -> Result<Box<dyn Any>, InstanceAnyPtr> {
    instance
        .downcast::<T>()
        .map(|instance| Box::new(instance as InstancePtr<DataSourcePtr>) as Box<dyn Any>)
}

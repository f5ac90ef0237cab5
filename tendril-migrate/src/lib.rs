//! Schema migration for data sources registered in a [Tendril](tendril) application.
//!
//! Data sources able to create or update their schema implement
//! [MigratableDataSource](datasource::MigratableDataSource) and are registered with
//! [data_source](application::MigrationApplication::data_source). Migration can then be triggered
//! explicitly with [migrate_schema](migration::migrate_schema), e.g. from a dedicated migration
//! script, or automatically on application start by mounting the
//! [MigrationComponent](component::MigrationComponent).
//!
//! Two strategies are supported: *automigrate*, which drops existing schema and creates it from
//! scratch, and *autoupdate*, which alters existing schema to match current models.

pub mod application;
pub mod component;
pub mod config;
pub mod datasource;
pub mod migration;

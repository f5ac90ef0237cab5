// a migration script: updates schema of all data sources, or rebuilds it from scratch when run
// with "--rebuild"

use std::sync::Mutex;
use tendril::application;
use tendril::future::{BoxFuture, FutureExt};
use tendril_context::component::Injectable;
use tendril_context::instance::ErrorPtr;
use tendril_migrate::application::MigrationApplication;
use tendril_migrate::config::ExistingSchema;
use tendril_migrate::datasource::MigratableDataSource;
use tendril_migrate::migration::SchemaMigrationOptions;

// a stand-in for a real database connector, keeping its "schema" in memory
#[derive(Default)]
struct InMemoryDataSource {
    tables: Mutex<Vec<String>>,
}

impl Injectable for InMemoryDataSource {}

impl InMemoryDataSource {
    fn create_tables(&self, models: Option<&[String]>) {
        let mut tables = self.tables.lock().unwrap();
        for model in models.unwrap_or(&["user".to_string(), "post".to_string()]) {
            if !tables.contains(model) {
                println!("Creating table {model}");
                tables.push(model.clone());
            }
        }
    }
}

impl MigratableDataSource for InMemoryDataSource {
    fn automigrate(&self, models: Option<&[String]>) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        println!("Dropping existing tables");
        self.tables.lock().unwrap().clear();
        self.create_tables(models);

        async { Ok(()) }.boxed()
    }

    fn autoupdate(&self, models: Option<&[String]>) -> BoxFuture<'_, Result<(), ErrorPtr>> {
        self.create_tables(models);

        async { Ok(()) }.boxed()
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
#[tokio::main]
async fn main() {
    let rebuild = std::env::args().any(|argument| argument == "--rebuild");

    let mut application =
        application::create_default().expect("unable to create default application");
    application
        .data_source("db", InMemoryDataSource::default())
        .expect("unable to register data source");

    let options = SchemaMigrationOptions {
        existing_schema: if rebuild {
            ExistingSchema::Drop
        } else {
            ExistingSchema::Alter
        },
        models: None,
    };

    // prints "Creating table user" and "Creating table post"
    application
        .migrate_schema(&options)
        .await
        .expect("error migrating schema");

    println!("Migrated the schema.");
}

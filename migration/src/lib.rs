pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_academy_tables;
mod m20250301_000002_create_system_settings;
mod m20250305_000001_create_pre_invoices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_academy_tables::Migration),
            Box::new(m20250301_000002_create_system_settings::Migration),
            Box::new(m20250305_000001_create_pre_invoices::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database, DatabaseConnection};

    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opt).await.expect("sqlite memory database")
    }

    #[tokio::test]
    async fn test_up_then_down_leaves_no_tables() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.expect("migrate up");

        let manager = SchemaManager::new(&db);
        for table in [
            "enrollments",
            "course_times",
            "scheduled_payments",
            "system_settings",
            "pre_invoices",
            "pre_invoice_details",
        ] {
            assert!(manager.has_table(table).await.unwrap(), "{table} missing");
        }

        Migrator::down(&db, None).await.expect("migrate down");

        for table in ["enrollments", "courses", "system_settings", "pre_invoices"] {
            assert!(!manager.has_table(table).await.unwrap(), "{table} left over");
        }
    }
}

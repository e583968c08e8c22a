pub use sea_orm_migration::prelude::*;

mod m20250101_000001_crm_core;
mod m20250101_000002_crm_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_crm_core::Migration),
            Box::new(m20250101_000002_crm_indexes::Migration),
        ]
    }
}

#![allow(dead_code)]

use crm::{CrmModule, CustomerInput, DealInput, OrgContext, TaskInput};
use entity::{customer, deal, task};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect, ensure_default_org};

pub struct CrmTestContext {
    pub db: DbPool,
    pub crm: CrmModule,
    pub org: OrgContext,
    pub other_org: OrgContext,
}

impl CrmTestContext {
    /// Fresh in-memory database with two organizations.
    pub async fn new() -> Self {
        let db = connect(&DatabaseSettings::new("sqlite::memory:"))
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();
        let org = ensure_default_org(&db, "Acme Holdings", "ops@acme.test")
            .await
            .unwrap();
        let other_org = ensure_default_org(&db, "Globex", "ops@globex.test")
            .await
            .unwrap();
        Self {
            crm: CrmModule::new(db.clone()),
            db,
            org: OrgContext::new(org),
            other_org: OrgContext::new(other_org),
        }
    }

    pub async fn customer_in(&self, ctx: &OrgContext, name: &str) -> customer::Model {
        self.crm
            .customers
            .create_customer(ctx, customer_input(name))
            .await
            .unwrap()
    }

    pub async fn deal_for(&self, ctx: &OrgContext, customer_id: i32, title: &str) -> deal::Model {
        self.crm
            .deals
            .create_deal(
                ctx,
                customer_id,
                DealInput {
                    title: Some(title.into()),
                    value: Some(1_000.0),
                    stage: Some("Lead".into()),
                    expected_close_date: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn task_for(&self, ctx: &OrgContext, deal_id: i32, description: &str) -> task::Model {
        self.crm
            .tasks
            .create_task(
                ctx,
                deal_id,
                TaskInput {
                    description: Some(description.into()),
                    due_date: None,
                },
            )
            .await
            .unwrap()
    }
}

pub fn customer_input(name: &str) -> CustomerInput {
    let slug = name.to_lowercase().replace(' ', "");
    CustomerInput {
        name: name.into(),
        email: format!("contact@{slug}.test"),
        phone: "555-0100".into(),
        company: None,
    }
}

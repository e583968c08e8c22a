use sea_orm_migration::prelude::*;

use crate::m20250101_000001_crm_core::{Customer, Deal, Task};

const INDEXES: [&str; 4] = [
    "idx_customer_organization",
    "idx_deal_customer",
    "idx_deal_organization",
    "idx_task_deal",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[0])
                    .table(Customer::Table)
                    .col(Customer::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[1])
                    .table(Deal::Table)
                    .col(Deal::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[2])
                    .table(Deal::Table)
                    .col(Deal::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[3])
                    .table(Task::Table)
                    .col(Task::DealId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEXES[3]).table(Task::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[2]).table(Deal::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[1]).table(Deal::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[0]).table(Customer::Table).to_owned())
            .await?;
        Ok(())
    }
}

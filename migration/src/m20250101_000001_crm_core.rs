use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Organization {
    Table,
    Id,
    Name,
    Email,
}

#[derive(DeriveIden)]
pub(crate) enum Customer {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Company,
    CreatedAt,
    OrganizationId,
}

#[derive(DeriveIden)]
pub(crate) enum Deal {
    Table,
    Id,
    Title,
    Value,
    Stage,
    ExpectedCloseDate,
    CustomerId,
    OrganizationId,
}

#[derive(DeriveIden)]
pub(crate) enum Task {
    Table,
    Id,
    Description,
    DueDate,
    Status,
    DealId,
    OrganizationId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organization::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organization::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organization::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Organization::Email).string_len(320))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customer::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customer::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Customer::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Customer::Phone).string_len(64).not_null())
                    .col(ColumnDef::new(Customer::Company).string_len(256))
                    .col(
                        ColumnDef::new(Customer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Customer::OrganizationId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_organization")
                            .from(Customer::Table, Customer::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deal::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deal::Title).string_len(300))
                    .col(ColumnDef::new(Deal::Value).double())
                    .col(ColumnDef::new(Deal::Stage).string_len(64))
                    .col(ColumnDef::new(Deal::ExpectedCloseDate).date())
                    .col(ColumnDef::new(Deal::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Deal::OrganizationId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_customer")
                            .from(Deal::Table, Deal::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deal_organization")
                            .from(Deal::Table, Deal::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Task::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Task::Description).text())
                    .col(ColumnDef::new(Task::DueDate).date())
                    .col(
                        ColumnDef::new(Task::Status)
                            .string_len(32)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Task::DealId).integer().not_null())
                    .col(ColumnDef::new(Task::OrganizationId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_deal")
                            .from(Task::Table, Task::DealId)
                            .to(Deal::Table, Deal::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_organization")
                            .from(Task::Table, Task::OrganizationId)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Task::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deal::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organization::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

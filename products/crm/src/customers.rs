use chrono::{DateTime, FixedOffset, Utc};
use entity::{customer, deal, organization, task};
use platform_api::{ApiError, ApiResult};
use platform_db::{DbPool, OrgContext};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::validate;

/// Writable customer fields, used for both create and update.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
}

struct ValidCustomer {
    name: String,
    email: String,
    phone: String,
    company: Option<String>,
}

impl CustomerInput {
    fn validate(&self) -> ApiResult<ValidCustomer> {
        Ok(ValidCustomer {
            name: validate::required("name", &self.name, 256)?,
            email: validate::email(&self.email)?,
            phone: validate::required("phone", &self.phone, 64)?,
            company: validate::optional("company", self.company.as_deref(), 256)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub organization_id: i32,
}

impl From<customer::Model> for CustomerView {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            company: model.company,
            created_at: model.created_at,
            organization_id: model.organization_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CustomerService {
    db: DbPool,
}

impl CustomerService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.customers.create", skip_all, fields(org_id = ctx.org_id))]
    pub async fn create_customer(
        &self,
        ctx: &OrgContext,
        input: CustomerInput,
    ) -> ApiResult<customer::Model> {
        let valid = input.validate()?;
        let org = organization::Entity::find_by_id(ctx.org_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("Organization"))?;
        let created = customer::ActiveModel {
            name: Set(valid.name),
            email: Set(valid.email),
            phone: Set(valid.phone),
            company: Set(valid.company),
            created_at: Set(Utc::now().into()),
            organization_id: Set(org.id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        info!(customer_id = created.id, "customer created");
        Ok(created)
    }

    #[instrument(name = "crm.customers.list", skip_all, fields(org_id = ctx.org_id))]
    pub async fn list_customers(&self, ctx: &OrgContext) -> ApiResult<Vec<customer::Model>> {
        let records = customer::Entity::find()
            .filter(customer::Column::OrganizationId.eq(ctx.org_id))
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    #[instrument(name = "crm.customers.get", skip_all, fields(org_id = ctx.org_id, customer_id = id))]
    pub async fn get_customer(&self, ctx: &OrgContext, id: i32) -> ApiResult<customer::Model> {
        find_scoped(&self.db, ctx, id)
            .await?
            .ok_or(ApiError::NotFound("Customer"))
    }

    /// Overwrites name, email, phone and company. Id, organization and
    /// creation time never change.
    #[instrument(name = "crm.customers.update", skip_all, fields(org_id = ctx.org_id, customer_id = id))]
    pub async fn update_customer(
        &self,
        ctx: &OrgContext,
        id: i32,
        input: CustomerInput,
    ) -> ApiResult<customer::Model> {
        let valid = input.validate()?;
        let existing = find_scoped(&self.db, ctx, id)
            .await?
            .ok_or(ApiError::NotFound("Customer"))?;
        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(valid.name);
        active.email = Set(valid.email);
        active.phone = Set(valid.phone);
        active.company = Set(valid.company);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Removes the customer with its deals and their tasks. Deleting an id
    /// that does not exist is not an error.
    #[instrument(name = "crm.customers.delete", skip_all, fields(org_id = ctx.org_id, customer_id = id))]
    pub async fn delete_customer(&self, ctx: &OrgContext, id: i32) -> ApiResult<()> {
        let txn = self.db.begin().await?;
        if find_scoped(&txn, ctx, id).await?.is_none() {
            debug!("customer absent, nothing to delete");
            txn.commit().await?;
            return Ok(());
        }

        let deal_ids = deal::Entity::find()
            .select_only()
            .column(deal::Column::Id)
            .filter(deal::Column::CustomerId.eq(id))
            .into_query();
        let tasks = task::Entity::delete_many()
            .filter(task::Column::DealId.in_subquery(deal_ids))
            .exec(&txn)
            .await?;
        let deals = deal::Entity::delete_many()
            .filter(deal::Column::CustomerId.eq(id))
            .exec(&txn)
            .await?;
        customer::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            deals = deals.rows_affected,
            tasks = tasks.rows_affected,
            "customer deleted"
        );
        Ok(())
    }
}

pub(crate) async fn find_scoped<C: ConnectionTrait>(
    conn: &C,
    ctx: &OrgContext,
    id: i32,
) -> ApiResult<Option<customer::Model>> {
    let record = customer::Entity::find_by_id(id)
        .filter(customer::Column::OrganizationId.eq(ctx.org_id))
        .one(conn)
        .await?;
    Ok(record)
}

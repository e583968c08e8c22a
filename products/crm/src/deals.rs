use chrono::NaiveDate;
use entity::{deal, task};
use platform_api::{ApiError, ApiResult};
use platform_db::{DbPool, OrgContext};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{customers, validate};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DealInput {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub expected_close_date: Option<NaiveDate>,
}

impl DealInput {
    fn title(&self) -> ApiResult<Option<String>> {
        validate::optional("title", self.title.as_deref(), 300)
    }

    fn stage(&self) -> ApiResult<Option<String>> {
        let stage = validate::optional("stage", self.stage.as_deref(), 64)?;
        if let Some(label) = stage.as_deref() {
            if !deal::KNOWN_STAGES.contains(&label) {
                debug!(stage = label, "deal stage outside the usual pipeline");
            }
        }
        Ok(stage)
    }
}

/// Serialized deal. Tasks are reachable through their own endpoint only.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    pub id: i32,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub expected_close_date: Option<NaiveDate>,
    pub customer_id: i32,
    pub organization_id: i32,
}

impl From<deal::Model> for DealView {
    fn from(model: deal::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            value: model.value,
            stage: model.stage,
            expected_close_date: model.expected_close_date,
            customer_id: model.customer_id,
            organization_id: model.organization_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DealService {
    db: DbPool,
}

impl DealService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.deals.create", skip_all, fields(org_id = ctx.org_id, customer_id = customer_id))]
    pub async fn create_deal(
        &self,
        ctx: &OrgContext,
        customer_id: i32,
        input: DealInput,
    ) -> ApiResult<deal::Model> {
        let title = input.title()?;
        let stage = input.stage()?;
        let customer = customers::find_scoped(&self.db, ctx, customer_id)
            .await?
            .ok_or(ApiError::NotFound("Customer"))?;
        let created = deal::ActiveModel {
            title: Set(title),
            value: Set(input.value),
            stage: Set(stage),
            expected_close_date: Set(input.expected_close_date),
            customer_id: Set(customer.id),
            organization_id: Set(ctx.org_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        info!(deal_id = created.id, "deal created");
        Ok(created)
    }

    /// Deals of one customer. An unknown customer yields an empty list.
    #[instrument(name = "crm.deals.by_customer", skip_all, fields(org_id = ctx.org_id, customer_id = customer_id))]
    pub async fn deals_by_customer(
        &self,
        ctx: &OrgContext,
        customer_id: i32,
    ) -> ApiResult<Vec<deal::Model>> {
        let records = deal::Entity::find()
            .filter(deal::Column::CustomerId.eq(customer_id))
            .filter(deal::Column::OrganizationId.eq(ctx.org_id))
            .order_by_asc(deal::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    #[instrument(name = "crm.deals.list", skip_all, fields(org_id = ctx.org_id))]
    pub async fn list_deals(&self, ctx: &OrgContext) -> ApiResult<Vec<deal::Model>> {
        let records = deal::Entity::find()
            .filter(deal::Column::OrganizationId.eq(ctx.org_id))
            .order_by_asc(deal::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    #[instrument(name = "crm.deals.update", skip_all, fields(org_id = ctx.org_id, deal_id = deal_id))]
    pub async fn update_deal(
        &self,
        ctx: &OrgContext,
        deal_id: i32,
        input: DealInput,
    ) -> ApiResult<deal::Model> {
        let title = input.title()?;
        let stage = input.stage()?;
        let existing = find_scoped(&self.db, ctx, deal_id)
            .await?
            .ok_or(ApiError::NotFound("Deal"))?;
        let mut active: deal::ActiveModel = existing.into();
        active.title = Set(title);
        active.value = Set(input.value);
        active.stage = Set(stage);
        active.expected_close_date = Set(input.expected_close_date);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes the deal and every task it owns in one transaction.
    #[instrument(name = "crm.deals.delete", skip_all, fields(org_id = ctx.org_id, deal_id = deal_id))]
    pub async fn delete_deal(&self, ctx: &OrgContext, deal_id: i32) -> ApiResult<()> {
        let txn = self.db.begin().await?;
        let existing = find_scoped(&txn, ctx, deal_id)
            .await?
            .ok_or(ApiError::NotFound("Deal"))?;
        let tasks = task::Entity::delete_many()
            .filter(task::Column::DealId.eq(existing.id))
            .exec(&txn)
            .await?;
        deal::Entity::delete_by_id(existing.id).exec(&txn).await?;
        txn.commit().await?;
        info!(tasks = tasks.rows_affected, "deal deleted");
        Ok(())
    }
}

pub(crate) async fn find_scoped<C: ConnectionTrait>(
    conn: &C,
    ctx: &OrgContext,
    id: i32,
) -> ApiResult<Option<deal::Model>> {
    let record = deal::Entity::find_by_id(id)
        .filter(deal::Column::OrganizationId.eq(ctx.org_id))
        .one(conn)
        .await?;
    Ok(record)
}

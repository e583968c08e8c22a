use chrono::NaiveDate;
use entity::task;
use platform_api::{ApiError, ApiResult};
use platform_db::{DbPool, OrgContext};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{deals, validate};

/// Writable task fields. A `status` sent by the caller is ignored on create.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskInput {
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: i32,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub deal_id: i32,
    pub organization_id: i32,
}

impl From<task::Model> for TaskView {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            due_date: model.due_date,
            status: model.status,
            deal_id: model.deal_id,
            organization_id: model.organization_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TaskService {
    db: DbPool,
}

impl TaskService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(name = "crm.tasks.create", skip_all, fields(org_id = ctx.org_id, deal_id = deal_id))]
    pub async fn create_task(
        &self,
        ctx: &OrgContext,
        deal_id: i32,
        input: TaskInput,
    ) -> ApiResult<task::Model> {
        let description =
            validate::optional("description", input.description.as_deref(), 65_535)?;
        let deal = deals::find_scoped(&self.db, ctx, deal_id)
            .await?
            .ok_or(ApiError::NotFound("Deal"))?;
        let created = task::ActiveModel {
            description: Set(description),
            due_date: Set(input.due_date),
            status: Set(task::STATUS_PENDING.to_string()),
            deal_id: Set(deal.id),
            organization_id: Set(ctx.org_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        info!(task_id = created.id, "task created");
        Ok(created)
    }

    #[instrument(name = "crm.tasks.by_deal", skip_all, fields(org_id = ctx.org_id, deal_id = deal_id))]
    pub async fn tasks_by_deal(
        &self,
        ctx: &OrgContext,
        deal_id: i32,
    ) -> ApiResult<Vec<task::Model>> {
        if deals::find_scoped(&self.db, ctx, deal_id).await?.is_none() {
            return Err(ApiError::NotFound("Deal"));
        }
        let records = task::Entity::find()
            .filter(task::Column::DealId.eq(deal_id))
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Stores `status` as given. Any label is accepted, "Pending" and
    /// "Completed" are merely the ones clients use.
    #[instrument(name = "crm.tasks.update_status", skip_all, fields(org_id = ctx.org_id, task_id = task_id, status = %status))]
    pub async fn update_task_status(
        &self,
        ctx: &OrgContext,
        task_id: i32,
        status: String,
    ) -> ApiResult<task::Model> {
        let existing = self
            .find_scoped(ctx, task_id)
            .await?
            .ok_or(ApiError::NotFound("Task"))?;
        let mut active: task::ActiveModel = existing.into();
        active.status = Set(status);
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    #[instrument(name = "crm.tasks.delete", skip_all, fields(org_id = ctx.org_id, task_id = task_id))]
    pub async fn delete_task(&self, ctx: &OrgContext, task_id: i32) -> ApiResult<()> {
        if self.find_scoped(ctx, task_id).await?.is_none() {
            return Err(ApiError::NotFound("Task"));
        }
        task::Entity::delete_by_id(task_id).exec(&self.db).await?;
        Ok(())
    }

    async fn find_scoped(&self, ctx: &OrgContext, task_id: i32) -> ApiResult<Option<task::Model>> {
        let record = task::Entity::find_by_id(task_id)
            .filter(task::Column::OrganizationId.eq(ctx.org_id))
            .one(&self.db)
            .await?;
        Ok(record)
    }
}

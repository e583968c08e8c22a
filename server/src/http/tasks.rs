use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use crm::{TaskInput, TaskView};
use platform_api::ApiResult;
use serde::Deserialize;

use super::{AppState, CurrentOrg};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deal/{deal_id}", get(tasks_by_deal).post(create_task))
        .route("/{task_id}/status", put(update_task_status))
        .route("/{task_id}", delete(delete_task))
}

#[derive(Deserialize)]
struct StatusQuery {
    status: String,
}

async fn create_task(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(deal_id): Path<i32>,
    Json(input): Json<TaskInput>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    let created = state.crm.tasks.create_task(&ctx, deal_id, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn tasks_by_deal(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(deal_id): Path<i32>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let records = state.crm.tasks.tasks_by_deal(&ctx, deal_id).await?;
    Ok(Json(records.into_iter().map(TaskView::from).collect()))
}

async fn update_task_status(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(task_id): Path<i32>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<TaskView>> {
    let updated = state
        .crm
        .tasks
        .update_task_status(&ctx, task_id, query.status)
        .await?;
    Ok(Json(updated.into()))
}

async fn delete_task(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(task_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.crm.tasks.delete_task(&ctx, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

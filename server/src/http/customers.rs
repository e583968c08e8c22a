use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use crm::{CustomerInput, CustomerView};
use platform_api::ApiResult;

use super::{AppState, CurrentOrg};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

async fn create_customer(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Json(input): Json<CustomerInput>,
) -> ApiResult<(StatusCode, Json<CustomerView>)> {
    let created = state.crm.customers.create_customer(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn list_customers(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
) -> ApiResult<Json<Vec<CustomerView>>> {
    let records = state.crm.customers.list_customers(&ctx).await?;
    Ok(Json(records.into_iter().map(CustomerView::from).collect()))
}

async fn get_customer(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(id): Path<i32>,
) -> ApiResult<Json<CustomerView>> {
    let record = state.crm.customers.get_customer(&ctx, id).await?;
    Ok(Json(record.into()))
}

async fn update_customer(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(id): Path<i32>,
    Json(input): Json<CustomerInput>,
) -> ApiResult<Json<CustomerView>> {
    let updated = state.crm.customers.update_customer(&ctx, id, input).await?;
    Ok(Json(updated.into()))
}

async fn delete_customer(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.crm.customers.delete_customer(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

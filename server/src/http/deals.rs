use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use crm::{DealInput, DealView};
use platform_api::ApiResult;

use super::{AppState, CurrentOrg};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deals))
        .route(
            "/customer/{customer_id}",
            get(deals_by_customer).post(create_deal),
        )
        .route("/{deal_id}", put(update_deal).delete(delete_deal))
}

async fn create_deal(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(customer_id): Path<i32>,
    Json(input): Json<DealInput>,
) -> ApiResult<(StatusCode, Json<DealView>)> {
    let created = state.crm.deals.create_deal(&ctx, customer_id, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn list_deals(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
) -> ApiResult<Json<Vec<DealView>>> {
    let records = state.crm.deals.list_deals(&ctx).await?;
    Ok(Json(records.into_iter().map(DealView::from).collect()))
}

async fn deals_by_customer(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(customer_id): Path<i32>,
) -> ApiResult<Json<Vec<DealView>>> {
    let records = state.crm.deals.deals_by_customer(&ctx, customer_id).await?;
    Ok(Json(records.into_iter().map(DealView::from).collect()))
}

async fn update_deal(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(deal_id): Path<i32>,
    Json(input): Json<DealInput>,
) -> ApiResult<Json<DealView>> {
    let updated = state.crm.deals.update_deal(&ctx, deal_id, input).await?;
    Ok(Json(updated.into()))
}

async fn delete_deal(
    State(state): State<AppState>,
    CurrentOrg(ctx): CurrentOrg,
    Path(deal_id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.crm.deals.delete_deal(&ctx, deal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

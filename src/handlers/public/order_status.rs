// handlers/public/order_status.rs - GET and POST /order-status handlers

use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Extension, Json, Query,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::order_service::OrderStatusView;
use crate::services::OrderService;

#[derive(Debug, Deserialize)]
pub struct OrderStatusQuery {
    pub order_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub order_id: Option<i64>,
    pub status_id: Option<i32>,
}

pub async fn order_status_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<OrderStatusQuery>, QueryRejection>,
) -> ApiResult<OrderStatusView> {
    let Query(query) = query?;
    let order_id = query
        .order_id
        .ok_or_else(|| ApiError::field_error("order_id", "order_id is required"))?;

    let status = OrderService::new(pool).status(order_id).await?;
    Ok(ApiResponse::success(status))
}

pub async fn order_status_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    payload: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(update) = payload?;
    let order_id = update
        .order_id
        .ok_or_else(|| ApiError::field_error("order_id", "order_id is required"))?;
    let status_id = update
        .status_id
        .ok_or_else(|| ApiError::field_error("status_id", "status_id is required"))?;

    OrderService::new(pool).update_status(order_id, status_id).await?;
    Ok(ApiResponse::success(json!({
        "order_id": order_id,
        "status_id": status_id
    })))
}

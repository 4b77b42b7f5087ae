// handlers/public/waiter_call_post.rs - POST /waiter-call handler

use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde_json::{json, Value};

use crate::database::models::NewWaiterCall;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::TableService;

/// Table identity is taken as given; nothing checks it exists
pub async fn waiter_call_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    payload: Result<Json<NewWaiterCall>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(call) = payload?;
    let call_id = TableService::new(pool).call_waiter(&call).await?;

    Ok(ApiResponse::created(json!({
        "call_id": call_id,
        "message": "Waiter has been notified"
    })))
}

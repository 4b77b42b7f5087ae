// handlers/admin/waiter_calls.rs - GET /admin/waiter-calls

use axum::extract::Extension;

use crate::database::models::WaiterCall;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::TableService;

const RECENT_CALLS: i64 = 20;

pub async fn waiter_calls_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Vec<WaiterCall>> {
    let calls = TableService::new(pool).recent_waiter_calls(RECENT_CALLS).await?;
    Ok(ApiResponse::success(calls))
}

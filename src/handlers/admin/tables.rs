// handlers/admin/tables.rs - GET /admin/tables

use axum::extract::Extension;

use crate::database::models::DiningTable;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::TableService;

pub async fn tables_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Vec<DiningTable>> {
    let tables = TableService::new(pool).all().await?;
    Ok(ApiResponse::success(tables))
}

// handlers/public/categories_get.rs - GET /categories handler

use axum::extract::Extension;

use crate::database::models::Category;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::MenuService;

pub async fn categories_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Vec<Category>> {
    let categories = MenuService::new(pool).categories().await?;
    Ok(ApiResponse::success(categories))
}

// handlers/public/menu_get.rs - GET /menu handler

use axum::extract::{rejection::QueryRejection, Extension, Query, State};

use crate::database::models::{MenuFilter, MenuItem};
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::MenuService;
use crate::state::AppState;

/// Active menu, optionally narrowed by `?category_id=` and `?search=`
pub async fn menu_get(
    State(state): State<AppState>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    filter: Result<Query<MenuFilter>, QueryRejection>,
) -> ApiResult<Vec<MenuItem>> {
    let Query(filter) = filter?;
    let items = MenuService::new(pool).menu(&state.media, &filter).await?;
    Ok(ApiResponse::success(items))
}

// handlers/public/table_menu_get.rs - GET /table-menu handler

use axum::extract::{rejection::QueryRejection, Extension, Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::{Category, DiningTable, MenuFilter, MenuItem};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::menu_service::normalize_category;
use crate::services::{MenuService, TableLookup, TableService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TableMenuQuery {
    pub table_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TableMenu {
    pub table: DiningTable,
    pub menu_items: Vec<MenuItem>,
    pub categories: Vec<Category>,
}

pub async fn table_menu_get(
    State(state): State<AppState>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<TableMenuQuery>, QueryRejection>,
) -> ApiResult<TableMenu> {
    let Query(query) = query?;
    let table_id = query
        .table_id
        .ok_or_else(|| ApiError::field_error("table_id", "table_id is required"))?;

    let table = TableService::new(pool.clone())
        .find(&TableLookup::Id(table_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Table not found"))?;

    let menus = MenuService::new(pool);
    let mut menu_items = menus.menu(&state.media, &MenuFilter::default()).await?;
    for item in &mut menu_items {
        item.category_name = normalize_category(&item.category_name);
    }
    let categories = menus.categories().await?;

    Ok(ApiResponse::success(TableMenu {
        table,
        menu_items,
        categories,
    }))
}

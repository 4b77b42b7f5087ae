// handlers/public/table_orders_get.rs - GET /table-orders handler

use axum::extract::{rejection::QueryRejection, Extension, Query};
use serde::Deserialize;

use crate::database::models::TableOrder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{OrderService, TableRef};

#[derive(Debug, Deserialize)]
pub struct TableOrdersQuery {
    pub table_id: Option<i64>,
    pub table_name: Option<String>,
}

impl TableOrdersQuery {
    pub fn table(self) -> Result<TableRef, ApiError> {
        if let Some(id) = self.table_id {
            return Ok(TableRef::Id(id));
        }
        self.table_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .map(TableRef::Name)
            .ok_or_else(|| ApiError::field_error("table_id", "table_id or table_name is required"))
    }
}

/// Latest ten orders placed from the table
pub async fn table_orders_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<TableOrdersQuery>, QueryRejection>,
) -> ApiResult<Vec<TableOrder>> {
    let Query(query) = query?;
    let table = query.table()?;

    let orders = OrderService::new(pool).for_table(&table).await?;
    Ok(ApiResponse::success(orders))
}

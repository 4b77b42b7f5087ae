// handlers/public/table_info_get.rs - GET /table-info handler

use axum::extract::{rejection::QueryRejection, Extension, Query};
use serde::{Deserialize, Serialize};

use crate::database::models::DiningTable;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantContext, TenantPool};
use crate::services::{TableLookup, TableService};

#[derive(Debug, Deserialize)]
pub struct TableInfoQuery {
    pub table_id: Option<i64>,
    pub qr_code: Option<String>,
}

impl TableInfoQuery {
    /// `table_id` wins when both are given
    pub fn lookup(self) -> Result<TableLookup, ApiError> {
        if let Some(id) = self.table_id {
            return Ok(TableLookup::Id(id));
        }
        match self.qr_code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
            Some(code) => Ok(TableLookup::QrCode(code)),
            None => Err(ApiError::field_error("table_id", "table_id or qr_code is required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableInfo {
    #[serde(flatten)]
    pub table: DiningTable,
    /// `{base}/menu/table-{table_id}`
    pub frontend_url: Option<String>,
}

pub async fn table_info_get(
    Extension(ctx): Extension<TenantContext>,
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<TableInfoQuery>, QueryRejection>,
) -> ApiResult<TableInfo> {
    let Query(query) = query?;
    let lookup = query.lookup()?;

    let table = TableService::new(pool)
        .find(&lookup)
        .await?
        .ok_or_else(|| ApiError::not_found("Table not found"))?;

    Ok(ApiResponse::success(TableInfo {
        frontend_url: ctx.table_url(table.table_id),
        table,
    }))
}

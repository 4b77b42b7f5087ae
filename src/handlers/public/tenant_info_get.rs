// handlers/public/tenant_info_get.rs - GET /tenant-info handler

use axum::extract::Extension;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};

#[derive(Debug, Serialize)]
pub struct TenantInfo {
    pub tenant_id: i64,
    pub name: String,
    pub domain: String,
    pub frontend_url: Option<String>,
    pub table_url_pattern: Option<String>,
}

/// The database name is not part of the response
pub async fn tenant_info_get(Extension(ctx): Extension<TenantContext>) -> ApiResult<TenantInfo> {
    let frontend_url = ctx.frontend_base();
    let table_url_pattern = ctx.table_url("{table_id}");
    let tenant = ctx
        .tenant
        .ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    Ok(ApiResponse::success(TenantInfo {
        tenant_id: tenant.id,
        name: tenant.name,
        domain: tenant.domain,
        table_url_pattern,
        frontend_url,
    }))
}

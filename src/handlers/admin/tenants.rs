// handlers/admin/tenants.rs - GET /admin/tenants

use axum::extract::State;
use serde::Serialize;

use crate::database::models::{Tenant, TenantStatus};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Directory entry without the database name
#[derive(Debug, Serialize)]
pub struct TenantSummary {
    pub id: i64,
    pub name: String,
    pub domain: String,
    pub status: TenantStatus,
}

impl From<Tenant> for TenantSummary {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            domain: tenant.domain,
            status: tenant.status,
        }
    }
}

/// Active tenants from the main directory, whichever host asked
pub async fn tenants_get(State(state): State<AppState>) -> ApiResult<Vec<TenantSummary>> {
    let tenants = state.resolver.directory().list_active().await?;
    Ok(ApiResponse::success(tenants.into_iter().map(TenantSummary::from).collect()))
}

// handlers/admin/orders.rs - GET /admin/orders and GET /admin/orders/stats

use axum::extract::Extension;

use crate::database::models::{AdminOrder, OrderStats};
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::OrderService;

const RECENT_ORDERS: i64 = 50;

pub async fn orders_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Vec<AdminOrder>> {
    let orders = OrderService::new(pool).recent(RECENT_ORDERS).await?;
    Ok(ApiResponse::success(orders))
}

pub async fn orders_stats_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<OrderStats> {
    let stats = OrderService::new(pool).stats().await?;
    Ok(ApiResponse::success(stats))
}

// handlers/public/orders_post.rs - POST /orders handler

use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde::Deserialize;

use crate::database::models::{NewOrder, OrderItem};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{OrderService, PlacedOrder};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub table_id: Option<i64>,
    pub table_name: Option<String>,
    pub customer_name: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl PlaceOrderRequest {
    /// Fill the defaults the ordering frontend relies on
    pub fn into_order(self) -> Result<NewOrder, ApiError> {
        let table_name = match (non_blank(self.table_name), self.table_id) {
            (Some(name), _) => name,
            (None, Some(id)) => format!("Table {}", id),
            (None, None) => return Err(ApiError::field_error("table_id", "table_id or table_name is required")),
        };
        let customer_name = non_blank(self.customer_name).unwrap_or_else(|| format!("{} Customer", table_name));
        let payment_method = non_blank(self.payment_method).unwrap_or_else(|| "cash".to_string());

        Ok(NewOrder {
            customer_name,
            table_name,
            payment_method,
            items: self.items,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Creates one order with its lines and totals in a single transaction,
/// priced from the menu. Not idempotent:
/// a retried request places a second order.
pub async fn orders_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> ApiResult<PlacedOrder> {
    let Json(request) = payload?;
    let order = request.into_order()?;

    let placed = OrderService::new(pool).place(&order).await?;
    Ok(ApiResponse::created(placed))
}

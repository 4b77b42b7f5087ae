use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of an order as the diner submits it. Prices are never taken
/// from the client; lines are priced from the menu when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "id")]
    pub menu_id: i64,
    pub quantity: i32,
}

/// Current name and price of an orderable (active) menu item
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MenuPrice {
    pub menu_id: i64,
    pub name: String,
    pub price: Decimal,
}

/// Priced order line, as written to `ti_order_menus`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub menu_id: i64,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl OrderLine {
    /// `None` when price times quantity does not fit a `Decimal`
    pub fn priced(menu: &MenuPrice, quantity: i32) -> Option<Self> {
        let subtotal = menu.price.checked_mul(Decimal::from(quantity))?;
        Some(Self {
            menu_id: menu.menu_id,
            name: menu.name.clone(),
            quantity,
            price: menu.price,
            subtotal,
        })
    }
}

/// Order as submitted from a table, before it has an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    /// Stored in `order_type`; the frontend reads table orders back by it
    pub table_name: String,
    pub payment_method: String,
    pub items: Vec<OrderItem>,
}

/// Sums written to `ti_orders` and `ti_order_totals`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub total: Decimal,
    pub total_items: i32,
}

impl OrderTotals {
    /// `None` on overflow of either the money sum or the item count
    pub fn of(lines: &[OrderLine]) -> Option<Self> {
        let mut subtotal = Decimal::ZERO;
        let mut total_items: i32 = 0;
        for line in lines {
            subtotal = subtotal.checked_add(line.subtotal)?;
            total_items = total_items.checked_add(line.quantity)?;
        }
        Some(Self {
            subtotal,
            total: subtotal,
            total_items,
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TableOrder {
    pub order_id: i64,
    pub first_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_total: Decimal,
    pub payment: String,
    pub order_type: String,
    pub date_added: DateTime<Utc>,
    pub status_id: i32,
    #[sqlx(skip)]
    pub customer_status: u8,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderStatusRow {
    pub status_id: i32,
    pub status_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminOrder {
    pub order_id: i64,
    pub first_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_total: Decimal,
    pub payment: String,
    pub order_type: String,
    pub date_added: DateTime<Utc>,
    pub status_id: i32,
    pub item_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderStats {
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub pending_orders: i64,
    pub preparing_orders: i64,
    pub completed_orders: i64,
}

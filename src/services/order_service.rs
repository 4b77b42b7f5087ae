use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    AdminOrder, MenuPrice, NewOrder, OrderLine, OrderStats, OrderTotals, TableOrder,
};

/// Status ids the kitchen workflow moves an order through
pub const STATUS_RECEIVED: i32 = 1;
pub const STATUS_PREPARING: i32 = 3;
pub const STATUS_ON_THE_WAY: i32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    Invalid(String),
    #[error("Order not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Database(DatabaseError::classify(err))
    }
}

/// Upper bound on one line's quantity
pub const MAX_QUANTITY: i32 = 999;
/// Upper bound on distinct lines in one order
pub const MAX_ITEMS: usize = 100;
/// Upper bound on a menu price accepted into an order
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub const TOTAL_CODE_SUBTOTAL: &str = "subtotal";
pub const TOTAL_CODE_TOTAL: &str = "total";

/// Reads and writes of one order, all-or-nothing. Dropping without `commit`
/// discards them.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Active menu item by id; `None` when it does not exist or is disabled
    async fn menu_item(&mut self, menu_id: i64) -> Result<Option<MenuPrice>, DatabaseError>;
    async fn insert_order(&mut self, order: &NewOrder, totals: &OrderTotals) -> Result<i64, DatabaseError>;
    async fn insert_line(&mut self, order_id: i64, line: &OrderLine) -> Result<(), DatabaseError>;
    async fn insert_totals(&mut self, order_id: i64, totals: &OrderTotals) -> Result<(), DatabaseError>;
    async fn commit(self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    type Tx: OrderTransaction;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub order_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub total_items: i32,
}

/// Customer-facing progress: 0 kitchen, 1 preparing, 2 on the way
pub fn customer_status(status_id: i32) -> u8 {
    match status_id {
        STATUS_PREPARING => 1,
        STATUS_ON_THE_WAY => 2,
        _ => 0,
    }
}

pub fn status_message(status_id: i32) -> &'static str {
    match status_id {
        STATUS_RECEIVED => "Order Sent to Kitchen",
        STATUS_PREPARING => "Chef is Preparing Your Meal",
        STATUS_ON_THE_WAY => "On Its Way to Your Table!",
        _ => "Order Received",
    }
}

fn validate(order: &NewOrder) -> Result<(), OrderError> {
    if order.items.is_empty() {
        return Err(OrderError::Invalid("Order must contain at least one item".to_string()));
    }
    if order.items.len() > MAX_ITEMS {
        return Err(OrderError::Invalid(format!(
            "Order must contain at most {} items",
            MAX_ITEMS
        )));
    }
    for (index, item) in order.items.iter().enumerate() {
        if !(1..=MAX_QUANTITY).contains(&item.quantity) {
            return Err(OrderError::Invalid(format!(
                "Item {} quantity must be between 1 and {}",
                index + 1,
                MAX_QUANTITY
            )));
        }
    }
    Ok(())
}

fn price_line(menu: &MenuPrice, quantity: i32) -> Result<OrderLine, OrderError> {
    if menu.price.is_sign_negative() || menu.price > MAX_UNIT_PRICE {
        return Err(OrderError::Invalid(format!(
            "Menu item {} has an invalid price",
            menu.menu_id
        )));
    }
    OrderLine::priced(menu, quantity)
        .ok_or_else(|| OrderError::Invalid(format!("Menu item {} total is out of range", menu.menu_id)))
}

/// Price every item from the menu, then insert the order row, its lines and
/// its totals in a single transaction.
///
/// Any failure returns before `commit`, so the transaction is dropped and
/// nothing is kept. There is no idempotency key: a client retrying after a
/// timeout can create a second order.
pub async fn place_order<S: OrderStore>(store: &S, order: &NewOrder) -> Result<PlacedOrder, OrderError> {
    validate(order)?;

    let mut tx = store.begin().await?;

    let mut lines = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let menu = tx
            .menu_item(item.menu_id)
            .await?
            .ok_or_else(|| OrderError::Invalid(format!("Menu item {} is not available", item.menu_id)))?;
        lines.push(price_line(&menu, item.quantity)?);
    }
    let totals = OrderTotals::of(&lines)
        .ok_or_else(|| OrderError::Invalid("Order total is out of range".to_string()))?;

    let order_id = tx.insert_order(order, &totals).await?;
    for line in &lines {
        tx.insert_line(order_id, line).await?;
    }
    tx.insert_totals(order_id, &totals).await?;
    tx.commit().await?;

    tracing::info!("Placed order {} for {} ({} lines)", order_id, order.table_name, lines.len());
    Ok(PlacedOrder {
        order_id,
        total: totals.total,
        total_items: totals.total_items,
    })
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderStore for PgOrderStore {
    type Tx = PgOrderTransaction;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError> {
        let tx = self.pool.begin().await.map_err(DatabaseError::classify)?;
        Ok(PgOrderTransaction { tx })
    }
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn menu_item(&mut self, menu_id: i64) -> Result<Option<MenuPrice>, DatabaseError> {
        sqlx::query_as::<_, MenuPrice>(
            r#"
            SELECT menu_id, menu_name AS name, menu_price AS price
            FROM ti_menus
            WHERE menu_id = $1 AND menu_status = true
            "#,
        )
        .bind(menu_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn insert_order(&mut self, order: &NewOrder, totals: &OrderTotals) -> Result<i64, DatabaseError> {
        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO ti_orders (
                first_name, order_type, payment, order_total, total_items,
                status_id, date_added
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING order_id
            "#,
        )
        .bind(&order.customer_name)
        .bind(&order.table_name)
        .bind(&order.payment_method)
        .bind(totals.total)
        .bind(totals.total_items)
        .bind(STATUS_RECEIVED)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(order_id)
    }

    async fn insert_line(&mut self, order_id: i64, line: &OrderLine) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO ti_order_menus (order_id, menu_id, name, quantity, price, subtotal)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order_id)
        .bind(line.menu_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.price)
        .bind(line.subtotal)
        .execute(&mut *self.tx)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(())
    }

    async fn insert_totals(&mut self, order_id: i64, totals: &OrderTotals) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO ti_order_totals (order_id, code, title, value, priority)
            VALUES ($1, $2, 'Subtotal', $3, 1), ($1, $4, 'Total', $5, 999)
            "#,
        )
        .bind(order_id)
        .bind(TOTAL_CODE_SUBTOTAL)
        .bind(totals.subtotal)
        .bind(TOTAL_CODE_TOTAL)
        .bind(totals.total)
        .execute(&mut *self.tx)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(())
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await.map_err(DatabaseError::classify)
    }
}

/// How the frontend names a table when asking for its orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    Id(i64),
    Name(String),
}

impl TableRef {
    /// Orders carry the table in `order_type` as "Table <id>" or the table's name
    pub fn order_type(&self) -> String {
        match self {
            TableRef::Id(id) => format!("Table {}", id),
            TableRef::Name(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusView {
    pub status_id: i32,
    pub status_name: String,
    pub status_message: &'static str,
    pub customer_status: u8,
}

/// Read and update orders in the selected database
pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn place(&self, order: &NewOrder) -> Result<PlacedOrder, OrderError> {
        place_order(&PgOrderStore::new(self.pool.clone()), order).await
    }

    pub async fn status(&self, order_id: i64) -> Result<OrderStatusView, OrderError> {
        let row = sqlx::query_as::<_, crate::database::models::OrderStatusRow>(
            r#"
            SELECT o.status_id, s.status_name
            FROM ti_orders o
            LEFT JOIN ti_statuses s ON o.status_id = s.status_id
            WHERE o.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OrderError::NotFound(order_id))?;

        Ok(OrderStatusView {
            status_id: row.status_id,
            status_name: row.status_name.unwrap_or_default(),
            status_message: status_message(row.status_id),
            customer_status: customer_status(row.status_id),
        })
    }

    pub async fn update_status(&self, order_id: i64, status_id: i32) -> Result<(), OrderError> {
        let result = sqlx::query("UPDATE ti_orders SET status_id = $1 WHERE order_id = $2")
            .bind(status_id)
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(order_id));
        }
        tracing::info!("Order {} moved to status {}", order_id, status_id);
        Ok(())
    }

    /// Latest ten orders placed from a table
    pub async fn for_table(&self, table: &TableRef) -> Result<Vec<TableOrder>, OrderError> {
        let mut orders = sqlx::query_as::<_, TableOrder>(
            r#"
            SELECT order_id, first_name, order_total, payment, order_type, date_added, status_id
            FROM ti_orders
            WHERE order_type = $1
            ORDER BY date_added DESC
            LIMIT 10
            "#,
        )
        .bind(table.order_type())
        .fetch_all(&self.pool)
        .await?;

        for order in &mut orders {
            order.customer_status = customer_status(order.status_id);
        }
        Ok(orders)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<AdminOrder>, OrderError> {
        let orders = sqlx::query_as::<_, AdminOrder>(
            r#"
            SELECT o.order_id, o.first_name, o.order_total, o.payment, o.order_type,
                   o.date_added, o.status_id, COUNT(om.order_id) AS item_count
            FROM ti_orders o
            LEFT JOIN ti_order_menus om ON o.order_id = om.order_id
            GROUP BY o.order_id
            ORDER BY o.date_added DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn stats(&self) -> Result<OrderStats, OrderError> {
        let stats = sqlx::query_as::<_, OrderStats>(
            r#"
            SELECT
                COUNT(*) AS total_orders,
                COALESCE(SUM(order_total), 0) AS total_revenue,
                COUNT(*) FILTER (WHERE status_id = $1) AS pending_orders,
                COUNT(*) FILTER (WHERE status_id = $2) AS preparing_orders,
                COUNT(*) FILTER (WHERE status_id = $3) AS completed_orders
            FROM ti_orders
            "#,
        )
        .bind(STATUS_RECEIVED)
        .bind(STATUS_PREPARING)
        .bind(STATUS_ON_THE_WAY)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{DiningTable, NewWaiterCall, WaiterCall};

/// How a diner's device identifies its table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLookup {
    Id(i64),
    QrCode(String),
}

pub struct TableService {
    pool: PgPool,
}

impl TableService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, lookup: &TableLookup) -> Result<Option<DiningTable>, DatabaseError> {
        const COLUMNS: &str = "SELECT table_id, table_name, qr_code, location_id, \
                               min_capacity, max_capacity, table_status FROM ti_tables";

        let column = match lookup {
            TableLookup::Id(_) => "table_id",
            TableLookup::QrCode(_) => "qr_code",
        };
        let sql = format!("{} WHERE {} = $1", COLUMNS, column);

        let query = sqlx::query_as::<_, DiningTable>(&sql);
        let query = match lookup {
            TableLookup::Id(id) => query.bind(*id),
            TableLookup::QrCode(code) => query.bind(code.as_str()),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::classify)
    }

    pub async fn all(&self) -> Result<Vec<DiningTable>, DatabaseError> {
        sqlx::query_as::<_, DiningTable>(
            r#"
            SELECT table_id, table_name, qr_code, location_id,
                   min_capacity, max_capacity, table_status
            FROM ti_tables
            ORDER BY table_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    /// Record a waiter call. The table id is taken as given.
    pub async fn call_waiter(&self, call: &NewWaiterCall) -> Result<i64, DatabaseError> {
        let table_name = call
            .table_name
            .clone()
            .unwrap_or_else(|| format!("Table {}", call.table_id));

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO ti_waiter_calls (table_id, table_name, message, status, created_at)
            VALUES ($1, $2, $3, 'pending', NOW())
            RETURNING id
            "#,
        )
        .bind(call.table_id)
        .bind(&table_name)
        .bind(&call.message)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        tracing::info!("Waiter called to {} (call {})", table_name, id);
        Ok(id)
    }

    pub async fn recent_waiter_calls(&self, limit: i64) -> Result<Vec<WaiterCall>, DatabaseError> {
        sqlx::query_as::<_, WaiterCall>(
            r#"
            SELECT id, table_id, table_name, message, status, created_at
            FROM ti_waiter_calls
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }
}

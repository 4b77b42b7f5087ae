use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Deserialize)]
pub struct NewWaiterCall {
    pub table_id: i64,
    pub table_name: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WaiterCall {
    pub id: i64,
    pub table_id: i64,
    pub table_name: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

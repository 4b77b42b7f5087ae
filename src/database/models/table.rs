use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiningTable {
    pub table_id: i64,
    pub table_name: String,
    pub qr_code: Option<String>,
    pub location_id: Option<i64>,
    pub min_capacity: Option<i32>,
    pub max_capacity: Option<i32>,
    pub table_status: bool,
}

// handlers/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET / - service info
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "name": "PayMyDine API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-tenant restaurant ordering API",
            "endpoints": {
                "tenant": ["/tenant-info"],
                "menu": ["/menu", "/categories", "/table-menu"],
                "orders": ["/orders", "/order-status", "/table-orders"],
                "tables": ["/table-info", "/waiter-call"],
                "theme": ["/theme-settings"],
                "media": ["/images"],
                "admin": ["/admin/orders", "/admin/orders/stats", "/admin/tables", "/admin/waiter-calls", "/admin/tenants"]
            }
        }
    }))
}

/// GET /health - pings the default database
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.databases.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "healthy",
                    "database": "connected",
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{self, admin, public};
use crate::middleware::resolve_tenant_middleware;
use crate::state::AppState;

/// Full router. Tenant-scoped routes are served both at the root and under `/api`.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let tenant_routes = tenant_routes(state.clone());

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(tenant_routes.clone())
        .nest("/api", tenant_routes)
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn tenant_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(admin_routes())
        .route_layer(axum::middleware::from_fn_with_state(state, resolve_tenant_middleware))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/tenant-info", get(public::tenant_info_get))
        .route("/menu", get(public::menu_get))
        .route("/categories", get(public::categories_get))
        .route("/orders", post(public::orders_post))
        .route("/waiter-call", post(public::waiter_call_post))
        .route("/table-info", get(public::table_info_get))
        .route("/table-menu", get(public::table_menu_get))
        .route("/table-orders", get(public::table_orders_get))
        .route(
            "/order-status",
            get(public::order_status_get).post(public::order_status_post),
        )
        .route(
            "/theme-settings",
            get(public::theme_settings_get).post(public::theme_settings_post),
        )
        .route("/images", get(public::images_get))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(admin::orders_get))
        .route("/admin/orders/stats", get(admin::orders_stats_get))
        .route("/admin/tables", get(admin::tables_get))
        .route("/admin/waiter-calls", get(admin::waiter_calls_get))
        .route("/admin/tenants", get(admin::tenants_get))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

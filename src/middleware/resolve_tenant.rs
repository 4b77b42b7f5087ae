use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::database::models::Tenant;
use crate::error::ApiError;
use crate::state::AppState;
use crate::tenant::ResolveInput;

/// Proxies in front of the API forward the diner-facing host here
pub const ORIGINAL_HOST_HEADER: &str = "x-original-host";
/// Explicit tenant for local testing, same as `?tenant=`
pub const TENANT_OVERRIDE_HEADER: &str = "x-tenant-subdomain";
pub const TENANT_QUERY_PARAM: &str = "tenant";

/// Database pool selected for this request, injected by middleware
#[derive(Clone)]
pub struct TenantPool(pub PgPool);

/// Who the request belongs to, injected by middleware
#[derive(Clone, Debug)]
pub struct TenantContext {
    /// `None` in default-database mode
    pub tenant: Option<Tenant>,
    pub database: String,
    pub host: Option<String>,
    pub scheme: &'static str,
}

impl TenantContext {
    /// Where diners reach the frontend: the tenant's domain, else the request host
    pub fn frontend_base(&self) -> Option<String> {
        let host = self
            .tenant
            .as_ref()
            .map(|t| t.domain.as_str())
            .or(self.host.as_deref())?;
        Some(format!("{}://{}", self.scheme, host))
    }

    /// Page a diner lands on after scanning a table's QR code
    pub fn table_url(&self, table_id: impl std::fmt::Display) -> Option<String> {
        self.frontend_base()
            .map(|base| format!("{}/menu/table-{}", base, table_id))
    }

    pub fn tenant_label(&self) -> &str {
        self.tenant.as_ref().map(|t| t.name.as_str()).unwrap_or("Default")
    }
}

/// Resolve the owning tenant from host/override and select its database.
/// Unknown subdomains run against the default database.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();
    let host = request_host(headers).or_else(|| request.uri().host().map(str::to_string));
    let tenant_override = query_override(request.uri().query())
        .or_else(|| header_value(headers, TENANT_OVERRIDE_HEADER));
    let scheme = request_scheme(headers);

    let tenant = state
        .resolver
        .resolve(ResolveInput {
            host: host.as_deref(),
            tenant_override: tenant_override.as_deref(),
        })
        .await
        .map_err(|e| {
            tracing::error!("Tenant resolution failed for host {:?}: {}", host, e);
            ApiError::from(e)
        })?;

    let pool = state.databases.select(tenant.as_ref()).await.map_err(|e| {
        tracing::error!("Failed to select database for tenant {:?}: {}", tenant.as_ref().map(|t| &t.name), e);
        ApiError::from(e)
    })?;

    let database = state.databases.target_database(tenant.as_ref()).to_string();
    tracing::debug!("Request routed to database '{}'", database);

    request.extensions_mut().insert(TenantContext {
        tenant,
        database,
        host,
        scheme,
    });
    request.extensions_mut().insert(TenantPool(pool));

    Ok(next.run(request).await)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn request_host(headers: &HeaderMap) -> Option<String> {
    header_value(headers, ORIGINAL_HOST_HEADER).or_else(|| header_value(headers, header::HOST.as_str()))
}

fn request_scheme(headers: &HeaderMap) -> &'static str {
    match header_value(headers, "x-forwarded-proto").as_deref() {
        Some("https") => "https",
        _ => "http",
    }
}

fn query_override(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TENANT_QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TenantStatus;
    use axum::http::HeaderValue;

    #[test]
    fn reads_tenant_from_query_string() {
        assert_eq!(query_override(Some("tenant=paris")), Some("paris".to_string()));
        assert_eq!(query_override(Some("table_id=4&tenant=rome")), Some("rome".to_string()));
        assert_eq!(query_override(Some("tenant=")), None);
        assert_eq!(query_override(Some("table_id=4")), None);
        assert_eq!(query_override(None), None);
    }

    #[test]
    fn original_host_wins_over_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("127.0.0.1:8001"));
        assert_eq!(request_host(&headers).as_deref(), Some("127.0.0.1:8001"));

        headers.insert(ORIGINAL_HOST_HEADER, HeaderValue::from_static("paris.paymydine.com"));
        assert_eq!(request_host(&headers).as_deref(), Some("paris.paymydine.com"));
    }

    #[test]
    fn frontend_base_prefers_tenant_domain() {
        let mut ctx = TenantContext {
            tenant: None,
            database: "paymydine".to_string(),
            host: Some("localhost:3000".to_string()),
            scheme: "http",
        };
        assert_eq!(ctx.frontend_base().as_deref(), Some("http://localhost:3000"));
        assert_eq!(ctx.tenant_label(), "Default");

        ctx.tenant = Some(Tenant {
            id: 1,
            name: "Paris".to_string(),
            domain: "paris.paymydine.com".to_string(),
            database: "tenant_paris".to_string(),
            status: TenantStatus::Active,
        });
        assert_eq!(ctx.frontend_base().as_deref(), Some("http://paris.paymydine.com"));
        assert_eq!(ctx.tenant_label(), "Paris");
        assert_eq!(
            ctx.table_url(12).as_deref(),
            Some("http://paris.paymydine.com/menu/table-12")
        );
        assert_eq!(
            ctx.table_url("{table_id}").as_deref(),
            Some("http://paris.paymydine.com/menu/table-{table_id}")
        );
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Tenant;

/// Read side of the `ti_tenants` table
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Active tenants whose domain is `subdomain` or starts with `subdomain.`
    async fn find_active(&self, subdomain: &str) -> Result<Vec<Tenant>, DatabaseError>;

    async fn list_active(&self) -> Result<Vec<Tenant>, DatabaseError>;
}

/// The match rule the SQL below implements, for directories kept in memory
pub fn domain_matches(domain: &str, subdomain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    let subdomain = subdomain.to_ascii_lowercase();
    domain == subdomain
        || domain
            .strip_prefix(&subdomain)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Tenant directory stored in the main database
#[derive(Clone)]
pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_active(&self, subdomain: &str) -> Result<Vec<Tenant>, DatabaseError> {
        let subdomain = subdomain.to_ascii_lowercase();
        let prefix = format!("{}.", subdomain);

        // starts_with() rather than LIKE so '_' and '%' in labels match literally
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, domain, database, status
            FROM ti_tenants
            WHERE lower(status) = 'active'
              AND (lower(domain) = $1 OR starts_with(lower(domain), $2))
            ORDER BY id
            "#,
        )
        .bind(&subdomain)
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(tenants)
    }

    async fn list_active(&self) -> Result<Vec<Tenant>, DatabaseError> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, domain, database, status
            FROM ti_tenants
            WHERE lower(status) = 'active'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(tenants)
    }
}

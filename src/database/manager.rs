use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::Tenant;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid tenant database name: {0}")]
    InvalidTenantName(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Split sqlx failures into "can't reach the database" and everything else
    pub fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::ConnectionError(err.to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Selects the database connection for a request.
///
/// Requests that resolved a tenant get a pool for that tenant's database;
/// everything else shares the default pool created at startup. Tenant pools
/// are created on first use and cached by database name.
pub struct DatabaseManager {
    config: DatabaseConfig,
    default_pool: PgPool,
    pools: Arc<RwLock<HashMap<String, PgPool>>>,
}

impl DatabaseManager {
    /// Build the manager and the default pool. The pool connects lazily so the
    /// process starts (and reports degraded health) while the database is down.
    pub fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let default_pool = Self::lazy_pool(&config, &config.default_database)?;
        Ok(Self {
            config,
            default_pool,
            pools: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Shared main database (tenant directory + no-tenant requests)
    pub fn default_pool(&self) -> PgPool {
        self.default_pool.clone()
    }

    /// Name of the database a request will use
    pub fn target_database<'a>(&'a self, tenant: Option<&'a Tenant>) -> &'a str {
        match tenant {
            Some(tenant) => &tenant.database,
            None => &self.config.default_database,
        }
    }

    /// Pool for the resolved tenant, or the default pool when there is none
    pub async fn select(&self, tenant: Option<&Tenant>) -> Result<PgPool, DatabaseError> {
        match tenant {
            Some(tenant) => self.tenant_pool(&tenant.database).await,
            None => Ok(self.default_pool()),
        }
    }

    /// Get tenant database pool (validated name)
    pub async fn tenant_pool(&self, database_name: &str) -> Result<PgPool, DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidTenantName(database_name.to_string()));
        }
        if database_name == self.config.default_database {
            return Ok(self.default_pool());
        }

        // Fast path: try read lock
        {
            let pools = self.pools.read().await;
            if let Some(pool) = pools.get(database_name) {
                return Ok(pool.clone());
            }
        }

        let mut pools = self.pools.write().await;
        // Another request may have created it while we waited for the lock
        if let Some(pool) = pools.get(database_name) {
            return Ok(pool.clone());
        }
        let pool = Self::lazy_pool(&self.config, database_name)?;
        pools.insert(database_name.to_string(), pool.clone());

        info!("Created database pool for: {}", database_name);
        Ok(pool)
    }

    fn lazy_pool(config: &DatabaseConfig, database_name: &str) -> Result<PgPool, DatabaseError> {
        let options = Self::connect_options(config, database_name)?;
        Ok(PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy_with(options))
    }

    fn connect_options(
        config: &DatabaseConfig,
        database_name: &str,
    ) -> Result<PgConnectOptions, DatabaseError> {
        let url = Self::build_connection_string(config, database_name)?;
        let mut options =
            PgConnectOptions::from_str(&url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !config.enable_query_logging {
            options = options.disable_statement_logging();
        }
        Ok(options)
    }

    fn build_connection_string(
        config: &DatabaseConfig,
        database_name: &str,
    ) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse("postgres://localhost")
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_host(Some(&config.host))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_port(Some(config.port))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_username(&config.username)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !config.password.is_empty() {
            url.set_password(Some(&config.password))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Pings the default pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.default_pool)
            .await
            .map_err(DatabaseError::classify)?;
        Ok(())
    }

    /// Close and remove all pools (e.g., on shutdown)
    pub async fn close_all(&self) {
        let mut pools = self.pools.write().await;
        for (name, pool) in pools.drain() {
            pool.close().await;
            info!("Closed database pool: {}", name);
        }
        self.default_pool.close().await;
    }

    /// Database names end up in connection URLs, so only plain identifiers pass
    fn is_valid_db_name(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= 63
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

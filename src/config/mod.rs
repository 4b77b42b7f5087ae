use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub tenancy: TenancyConfig,
    pub media: MediaConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Connection settings shared by the main database and every tenant database.
/// Only the database name differs between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Holds the tenant directory and serves requests that resolve to no tenant
    pub default_database: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Honour `?tenant=` and `X-Tenant-Subdomain` in place of host parsing
    pub allow_override: bool,
    /// Leading host labels that never name a tenant
    pub ignored_subdomains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Root of the hashed attachment tree (`aaa/bbb/ccc/<disk_name>.<ext>`)
    pub root: PathBuf,
    /// Served when an image cannot be resolved
    pub placeholder: PathBuf,
    /// Public path returned in menu listings for unresolved images
    pub placeholder_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("PAYMYDINE_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // DATABASE_URL first, individual fields win over it
        if let Ok(v) = env::var("DATABASE_URL") {
            match self.database.apply_url(&v) {
                Ok(()) => {}
                Err(e) => tracing::warn!("Ignoring DATABASE_URL: {}", e),
            }
        }
        if let Ok(v) = env::var("DATABASE_HOST") {
            self.database.host = v;
        }
        if let Ok(v) = env::var("DATABASE_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Ok(v) = env::var("DATABASE_USERNAME") {
            self.database.username = v;
        }
        if let Ok(v) = env::var("DATABASE_PASSWORD") {
            self.database.password = v;
        }
        if let Ok(v) = env::var("DATABASE_DEFAULT_NAME") {
            self.database.default_database = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Tenancy overrides
        if let Ok(v) = env::var("TENANCY_ALLOW_OVERRIDE") {
            self.tenancy.allow_override = v.parse().unwrap_or(self.tenancy.allow_override);
        }
        if let Ok(v) = env::var("TENANCY_IGNORED_SUBDOMAINS") {
            self.tenancy.ignored_subdomains = split_list(&v);
        }

        // Media overrides
        if let Ok(v) = env::var("MEDIA_ROOT") {
            self.media.root = PathBuf::from(v);
        }
        if let Ok(v) = env::var("MEDIA_PLACEHOLDER") {
            self.media.placeholder = PathBuf::from(v);
        }
        if let Ok(v) = env::var("MEDIA_PLACEHOLDER_URL") {
            self.media.placeholder_url = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8001 },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                username: "postgres".to_string(),
                password: String::new(),
                default_database: "paymydine".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            tenancy: TenancyConfig {
                allow_override: true,
                ignored_subdomains: vec!["www".to_string()],
            },
            media: MediaConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8001 },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                username: "paymydine".to_string(),
                password: String::new(),
                default_database: "paymydine".to_string(),
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            tenancy: TenancyConfig {
                allow_override: true,
                ignored_subdomains: vec!["www".to_string()],
            },
            media: MediaConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.paymydine.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8001 },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                username: "paymydine".to_string(),
                password: String::new(),
                default_database: "paymydine".to_string(),
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            tenancy: TenancyConfig {
                allow_override: false,
                ignored_subdomains: vec!["www".to_string()],
            },
            media: MediaConfig::default(),
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://paymydine.com".to_string()],
            },
        }
    }
}

impl DatabaseConfig {
    /// Take host, port, credentials and default database from a connection URL
    pub fn apply_url(&mut self, raw: &str) -> Result<(), url::ParseError> {
        let url = url::Url::parse(raw)?;
        if let Some(host) = url.host_str() {
            self.host = host.to_string();
        }
        if let Some(port) = url.port() {
            self.port = port;
        }
        if !url.username().is_empty() {
            self.username = url.username().to_string();
        }
        if let Some(password) = url.password() {
            self.password = password.to_string();
        }
        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            self.default_database = database.to_string();
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/media/attachments/public"),
            placeholder: PathBuf::from("images/pasta.png"),
            placeholder_url: "/images/pasta.png".to_string(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::services::MediaLibrary;
use crate::tenant::{PgTenantDirectory, TenantDirectory, TenantResolver};

/// Shared by every request
#[derive(Clone)]
pub struct AppState {
    pub resolver: TenantResolver,
    pub databases: Arc<DatabaseManager>,
    pub media: MediaLibrary,
}

impl AppState {
    /// Tenant directory read from the default database
    pub fn new(config: &AppConfig) -> Result<Self, DatabaseError> {
        let databases = DatabaseManager::new(config.database.clone())?;
        let directory = Arc::new(PgTenantDirectory::new(databases.default_pool()));
        Ok(Self::assemble(config, databases, directory))
    }

    pub fn with_directory(
        config: &AppConfig,
        directory: Arc<dyn TenantDirectory>,
    ) -> Result<Self, DatabaseError> {
        let databases = DatabaseManager::new(config.database.clone())?;
        Ok(Self::assemble(config, databases, directory))
    }

    fn assemble(config: &AppConfig, databases: DatabaseManager, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            resolver: TenantResolver::new(directory, config.tenancy.clone()),
            databases: Arc::new(databases),
            media: MediaLibrary::new(&config.media),
        }
    }
}

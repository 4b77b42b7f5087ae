use std::sync::Arc;

use tracing::{debug, warn};

use super::directory::TenantDirectory;
use super::host::TenantHint;
use crate::config::TenancyConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::Tenant;

/// Inputs the resolver reads from a request
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveInput<'a> {
    pub host: Option<&'a str>,
    /// `?tenant=` or `X-Tenant-Subdomain`; ignored unless overrides are enabled
    pub tenant_override: Option<&'a str>,
}

/// Maps a request to the tenant that owns it, if any
#[derive(Clone)]
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    tenancy: TenancyConfig,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, tenancy: TenancyConfig) -> Self {
        Self { directory, tenancy }
    }

    pub fn directory(&self) -> &Arc<dyn TenantDirectory> {
        &self.directory
    }

    /// Candidate subdomain for a request, before any directory lookup
    pub fn hint(&self, input: ResolveInput<'_>) -> Option<TenantHint> {
        if self.tenancy.allow_override {
            if let Some(hint) = input.tenant_override.and_then(TenantHint::from_override) {
                return Some(hint);
            }
        }
        input
            .host
            .and_then(|host| TenantHint::from_host(host, &self.tenancy.ignored_subdomains))
    }

    /// `Ok(None)` means default-database mode. Only directory failures are errors.
    pub async fn resolve(&self, input: ResolveInput<'_>) -> Result<Option<Tenant>, DatabaseError> {
        let Some(hint) = self.hint(input) else {
            return Ok(None);
        };

        let candidates = self.directory.find_active(&hint.subdomain).await?;
        if candidates.len() > 1 {
            warn!(
                "{} active tenants match subdomain '{}': {:?}",
                candidates.len(),
                hint.subdomain,
                candidates.iter().map(|t| t.domain.as_str()).collect::<Vec<_>>()
            );
        }

        let tenant = pick(candidates, &hint);
        match &tenant {
            Some(t) => debug!("Resolved subdomain '{}' to tenant '{}' ({})", hint.subdomain, t.name, t.database),
            None => debug!("No tenant for subdomain '{}', using default database", hint.subdomain),
        }
        Ok(tenant)
    }
}

/// Most specific match wins: domain equal to the full host, then domain equal
/// to the bare subdomain, then any prefix match. Lowest id breaks what remains.
fn pick(candidates: Vec<Tenant>, hint: &TenantHint) -> Option<Tenant> {
    let rank = |tenant: &Tenant| {
        let domain = tenant.domain.to_ascii_lowercase();
        if hint.host.as_deref() == Some(domain.as_str()) {
            0
        } else if domain == hint.subdomain {
            1
        } else {
            2
        }
    };

    candidates
        .into_iter()
        .filter(Tenant::is_active)
        .min_by_key(|t| (rank(t), t.id))
}

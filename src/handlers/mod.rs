// handlers/mod.rs - Handler tiers
//
// public: the diner-facing ordering endpoints, tenant-scoped by host
// admin:  read-only views for restaurant staff, tenant-scoped the same way
//
// Both tiers sit behind resolve_tenant_middleware, which injects
// TenantContext and TenantPool. The root and health endpoints do not.
pub mod admin;
pub mod public;
pub mod system;

pub use system::{health, root};

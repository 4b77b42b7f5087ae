//! Subdomain-to-tenant resolution.
//!
//! A request's host (or an override during local testing) yields a candidate
//! subdomain; the directory in the main database maps it to at most one
//! active tenant. No match is not an error: the request runs against the
//! default database.

pub mod directory;
pub mod host;
pub mod resolver;

pub use directory::{domain_matches, PgTenantDirectory, TenantDirectory};
pub use host::TenantHint;
pub use resolver::{ResolveInput, TenantResolver};

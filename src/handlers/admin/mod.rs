// handlers/admin/mod.rs - Staff-facing read endpoints (/admin/*)
//
// Scoped to the resolved tenant like the public handlers. There is no
// authentication layer in front of these.
pub mod orders;
pub mod tables;
pub mod tenants;
pub mod waiter_calls;

pub use orders::{orders_get, orders_stats_get};
pub use tables::tables_get;
pub use tenants::tenants_get;
pub use waiter_calls::waiter_calls_get;

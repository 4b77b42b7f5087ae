// handlers/public/mod.rs - Diner-facing endpoints
//
// Every handler here receives the pool selected for the request's tenant;
// none of them know which database that is.
pub mod categories_get;
pub mod images_get;
pub mod menu_get;
pub mod order_status;
pub mod orders_post;
pub mod table_info_get;
pub mod table_menu_get;
pub mod table_orders_get;
pub mod tenant_info_get;
pub mod theme_settings;
pub mod waiter_call_post;

pub use categories_get::categories_get;
pub use images_get::images_get;
pub use menu_get::menu_get;
pub use order_status::{order_status_get, order_status_post};
pub use orders_post::orders_post;
pub use table_info_get::table_info_get;
pub use table_menu_get::table_menu_get;
pub use table_orders_get::table_orders_get;
pub use tenant_info_get::tenant_info_get;
pub use theme_settings::{theme_settings_get, theme_settings_post};
pub use waiter_call_post::waiter_call_post;

pub mod menu;
pub mod order;
pub mod table;
pub mod tenant;
pub mod waiter_call;

pub use menu::{
    Category, MenuFilter, MenuItem, MenuItemRow, MenuOption, MenuOptionRow, MenuOptionValue, MenuOptionValueRow,
};
pub use order::{
    AdminOrder, MenuPrice, NewOrder, OrderItem, OrderLine, OrderStats, OrderStatusRow, OrderTotals, TableOrder,
};
pub use table::DiningTable;
pub use tenant::{Tenant, TenantStatus};
pub use waiter_call::{NewWaiterCall, WaiterCall};

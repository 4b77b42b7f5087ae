pub mod media;
pub mod menu_service;
pub mod order_service;
pub mod table_service;
pub mod theme_service;

pub use media::MediaLibrary;
pub use menu_service::MenuService;
pub use order_service::{OrderError, OrderService, PlacedOrder, TableRef};
pub use table_service::{TableLookup, TableService};
pub use theme_service::{PublicTheme, ThemeService, ThemeSettings};

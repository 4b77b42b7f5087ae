use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Menu row as read from `ti_menus` joined to its category and thumbnail
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_name: String,
    /// Attachment file name as uploaded
    pub image: Option<String>,
    /// Hashed on-disk name; its first nine characters pick the directory
    pub image_disk: Option<String>,
}

/// Menu item as served to the ordering frontend
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_name: String,
    pub image: String,
    pub options: Vec<MenuOption>,
}

/// Option group attached to a menu item, e.g. "Size" or "Extras"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuOption {
    pub id: i64,
    pub name: String,
    pub display_type: String,
    pub required: bool,
    pub priority: Option<i32>,
    pub values: Vec<MenuOptionValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuOptionValue {
    pub id: i64,
    pub value: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub is_default: bool,
}

/// `ti_menu_options` joined to the item it is attached to
#[derive(Debug, Clone, FromRow)]
pub struct MenuOptionRow {
    pub menu_id: i64,
    pub id: i64,
    pub name: String,
    pub display_type: Option<String>,
    pub required: Option<bool>,
    pub priority: Option<i32>,
}

/// `ti_menu_option_values` selected for one item's option
#[derive(Debug, Clone, FromRow)]
pub struct MenuOptionValueRow {
    pub menu_id: i64,
    pub option_id: i64,
    pub id: i64,
    pub value: String,
    pub price: Option<Decimal>,
    pub is_default: Option<bool>,
}

/// Narrowing of `GET /menu`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilter {
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

impl MenuFilter {
    /// Substring pattern for `ILIKE`, with the wildcard characters escaped
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
    pub priority: Option<i32>,
}

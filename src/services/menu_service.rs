use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;

use super::media::MediaLibrary;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, MenuFilter, MenuItem, MenuItemRow, MenuOption, MenuOptionRow, MenuOptionValue, MenuOptionValueRow,
};

/// Menu and category listings for the ordering frontend
pub struct MenuService {
    pool: PgPool,
}

impl MenuService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active menu items with their category, resolved image URL and options
    pub async fn menu(&self, media: &MediaLibrary, filter: &MenuFilter) -> Result<Vec<MenuItem>, DatabaseError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT
                m.menu_id AS id,
                m.menu_name AS name,
                m.menu_description AS description,
                m.menu_price AS price,
                COALESCE(c.name, 'Main') AS category_name,
                ma.name AS image,
                ma.disk_name AS image_disk
            FROM ti_menus m
            LEFT JOIN ti_menu_categories mc ON m.menu_id = mc.menu_id
            LEFT JOIN ti_categories c ON mc.category_id = c.category_id
            LEFT JOIN ti_media_attachments ma ON ma.attachment_type = 'menus'
                AND ma.attachment_id = m.menu_id
                AND (ma.tag = 'thumb' OR ma.tag IS NULL)
            WHERE m.menu_status = true
              AND (c.frontend_visible IS NULL OR c.frontend_visible = true)
              AND ($1::bigint IS NULL OR c.category_id = $1)
              AND ($2::text IS NULL OR m.menu_name ILIKE $2 OR m.menu_description ILIKE $2)
            ORDER BY m.sort_order ASC, c.name, m.menu_name
            "#,
        )
        .bind(filter.category_id)
        .bind(filter.search_pattern())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        let menu_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let (options, values) = self.options_for(&menu_ids).await?;
        let options = attach_options(options, values);

        // Image resolution stats files; keep it off the async workers
        let media = media.clone();
        tokio::task::spawn_blocking(move || {
            rows.into_iter()
                .map(|row| {
                    let image = media.menu_image_url(row.image_disk.as_deref(), row.image.as_deref());
                    MenuItem {
                        id: row.id,
                        name: row.name,
                        description: row.description,
                        price: row.price,
                        category_name: row.category_name,
                        image,
                        options: options.get(&row.id).cloned().unwrap_or_default(),
                    }
                })
                .collect::<Vec<MenuItem>>()
        })
        .await
        .map_err(|e| DatabaseError::QueryError(format!("menu image resolution failed: {}", e)))
    }

    async fn options_for(
        &self,
        menu_ids: &[i64],
    ) -> Result<(Vec<MenuOptionRow>, Vec<MenuOptionValueRow>), DatabaseError> {
        if menu_ids.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let options = sqlx::query_as::<_, MenuOptionRow>(
            r#"
            SELECT
                mio.menu_id,
                mo.option_id AS id,
                mo.option_name AS name,
                mo.display_type,
                mio.required,
                mio.priority
            FROM ti_menu_options mo
            JOIN ti_menu_item_options mio ON mo.option_id = mio.option_id
            WHERE mio.menu_id = ANY($1)
            ORDER BY mio.menu_id, mio.priority, mo.option_name
            "#,
        )
        .bind(menu_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        let values = sqlx::query_as::<_, MenuOptionValueRow>(
            r#"
            SELECT
                mio.menu_id,
                mio.option_id,
                mov.option_value_id AS id,
                mov.value,
                mov.new_price AS price,
                mov.is_default
            FROM ti_menu_option_values mov
            JOIN ti_menu_item_option_values miov ON mov.option_value_id = miov.option_value_id
            JOIN ti_menu_item_options mio ON miov.menu_option_id = mio.menu_option_id
            WHERE mio.menu_id = ANY($1)
            ORDER BY mio.menu_id, mio.option_id, miov.priority, mov.value
            "#,
        )
        .bind(menu_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok((options, values))
    }

    /// Enabled categories that are not hidden from the frontend
    pub async fn categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT
                c.category_id,
                TRIM(c.name) AS category_name,
                c.description,
                c.priority
            FROM ti_categories c
            WHERE c.status = true
              AND (c.frontend_visible IS NULL OR c.frontend_visible = true)
            ORDER BY c.priority ASC NULLS LAST, c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        Ok(categories)
    }
}

/// Group option rows by menu item, keeping query order, and hang each
/// option's values under it
pub fn attach_options(
    options: Vec<MenuOptionRow>,
    values: Vec<MenuOptionValueRow>,
) -> HashMap<i64, Vec<MenuOption>> {
    let mut values_by_option: HashMap<(i64, i64), Vec<MenuOptionValue>> = HashMap::new();
    for row in values {
        values_by_option
            .entry((row.menu_id, row.option_id))
            .or_default()
            .push(MenuOptionValue {
                id: row.id,
                value: row.value,
                price: row.price.unwrap_or(Decimal::ZERO),
                is_default: row.is_default.unwrap_or(false),
            });
    }

    let mut by_menu: HashMap<i64, Vec<MenuOption>> = HashMap::new();
    for row in options {
        let values = values_by_option.remove(&(row.menu_id, row.id)).unwrap_or_default();
        by_menu.entry(row.menu_id).or_default().push(MenuOption {
            id: row.id,
            name: row.name,
            display_type: row.display_type.unwrap_or_else(|| "radio".to_string()),
            required: row.required.unwrap_or(false),
            priority: row.priority,
            values,
        });
    }
    by_menu
}

/// Collapse the spellings restaurants use into the frontend's category keys
pub fn normalize_category(name: &str) -> String {
    let name = name.trim();
    let canonical = match name.to_lowercase().as_str() {
        "starter" | "starters" | "appetizer" | "appetizers" => "Appetizer",
        "main" | "mains" | "main course" | "main courses" => "Main Course",
        "drink" | "drinks" | "beverage" | "beverages" => "Drinks",
        "seafood" | "seafoods" => "Seafoods",
        "salad" | "salads" => "Salads",
        "special" | "specials" => "Specials",
        "" => "Main",
        _ => return name.to_string(),
    };
    canonical.to_string()
}

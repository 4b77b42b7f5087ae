use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;

/// Theme rows are looked up by code; the legacy code is still found on older tenants
const THEME_CODES: [&str; 2] = ["frontend-theme", "paymydine-nextjs"];

const DEFAULT_PRIMARY: &str = "#E7CBA9";
const DEFAULT_SECONDARY: &str = "#EFC7B1";
const DEFAULT_ACCENT: &str = "#3B3B3B";
const DEFAULT_BACKGROUND: &str = "#FAFAFA";

/// Theme identifiers the ordering frontend ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicTheme {
    CleanLight,
    ModernDark,
    GoldLuxury,
    VibrantColors,
    Minimal,
}

impl PublicTheme {
    /// Admin panel stores either the short key or the display name
    pub fn from_admin(name: &str) -> Option<Self> {
        match name.trim() {
            "light" | "Clean Light Theme" => Some(PublicTheme::CleanLight),
            "dark" | "Modern Dark Theme" => Some(PublicTheme::ModernDark),
            "gold" | "Gold Luxury Theme" => Some(PublicTheme::GoldLuxury),
            "colorful" | "Vibrant Colors Theme" => Some(PublicTheme::VibrantColors),
            "minimal" | "Minimal Theme" => Some(PublicTheme::Minimal),
            _ => None,
        }
    }

    pub fn admin_name(&self) -> &'static str {
        match self {
            PublicTheme::CleanLight => "light",
            PublicTheme::ModernDark => "dark",
            PublicTheme::GoldLuxury => "gold",
            PublicTheme::VibrantColors => "colorful",
            PublicTheme::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub theme_id: PublicTheme,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            theme_id: PublicTheme::CleanLight,
            primary_color: DEFAULT_PRIMARY.to_string(),
            secondary_color: DEFAULT_SECONDARY.to_string(),
            accent_color: DEFAULT_ACCENT.to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl ThemeSettings {
    /// Read the admin-side JSON blob; unknown theme names fall back to clean-light
    pub fn from_admin_data(data: &Value) -> Self {
        let text = |key: &str, default: &str| {
            data.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let theme_id = data
            .get("theme_configuration")
            .and_then(Value::as_str)
            .and_then(PublicTheme::from_admin)
            .unwrap_or(PublicTheme::CleanLight);

        Self {
            theme_id,
            primary_color: text("primary_color", DEFAULT_PRIMARY),
            secondary_color: text("secondary_color", DEFAULT_SECONDARY),
            accent_color: text("accent_color", DEFAULT_ACCENT),
            background_color: text("background_color", DEFAULT_BACKGROUND),
        }
    }

    /// Keys merged into the admin-side blob on save
    pub fn to_admin_patch(&self) -> Value {
        json!({
            "theme_configuration": self.theme_id.admin_name(),
            "primary_color": self.primary_color,
            "secondary_color": self.secondary_color,
            "accent_color": self.accent_color,
            "background_color": self.background_color,
        })
    }
}

/// A candidate row in `ti_themes`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ThemeRow {
    pub theme_id: i64,
    pub code: String,
    pub data: Option<Value>,
}

impl ThemeRow {
    fn has_settings(&self) -> bool {
        self.data.as_ref().is_some_and(Value::is_object)
    }
}

/// The row both reads and writes use: the first by code preference (then
/// id) that carries a settings object, else the first row at all
pub fn pick_row(mut rows: Vec<ThemeRow>) -> Option<ThemeRow> {
    let rank = |code: &str| THEME_CODES.iter().position(|c| *c == code).unwrap_or(THEME_CODES.len());
    rows.sort_by(|a, b| rank(&a.code).cmp(&rank(&b.code)).then(a.theme_id.cmp(&b.theme_id)));

    match rows.iter().position(ThemeRow::has_settings) {
        Some(index) => Some(rows.swap_remove(index)),
        None => rows.into_iter().next(),
    }
}

pub struct ThemeService {
    pool: PgPool,
}

impl ThemeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_row(&self) -> Result<Option<ThemeRow>, DatabaseError> {
        let codes: Vec<String> = THEME_CODES.iter().map(|c| c.to_string()).collect();
        let rows = sqlx::query_as::<_, ThemeRow>("SELECT theme_id, code, data FROM ti_themes WHERE code = ANY($1)")
            .bind(codes)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        Ok(pick_row(rows))
    }

    /// Settings of the current theme row; defaults when there is none
    pub async fn load(&self) -> Result<ThemeSettings, DatabaseError> {
        match self.current_row().await? {
            Some(ThemeRow { data: Some(data), .. }) if data.is_object() => Ok(ThemeSettings::from_admin_data(&data)),
            _ => {
                tracing::debug!("No theme settings found, serving default theme settings");
                Ok(ThemeSettings::default())
            }
        }
    }

    /// Merge the settings into the same row `load` reads
    pub async fn save(&self, settings: &ThemeSettings) -> Result<(), DatabaseError> {
        let row = self
            .current_row()
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Theme not found".to_string()))?;

        sqlx::query(
            r#"
            UPDATE ti_themes
            SET data = (CASE WHEN jsonb_typeof(data) = 'object' THEN data ELSE '{}'::jsonb END) || $1::jsonb,
                updated_at = NOW()
            WHERE theme_id = $2
            "#,
        )
        .bind(settings.to_admin_patch())
        .bind(row.theme_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        tracing::info!("Theme '{}' set to {:?}", row.code, settings.theme_id);
        Ok(())
    }
}

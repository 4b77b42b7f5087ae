// handlers/public/theme_settings.rs - GET and POST /theme-settings handlers

use axum::extract::{rejection::JsonRejection, Extension, Json};
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{PublicTheme, ThemeService, ThemeSettings};

/// Colours left out keep their defaults
#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub theme_id: PublicTheme,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
}

impl From<ThemeUpdate> for ThemeSettings {
    fn from(update: ThemeUpdate) -> Self {
        let defaults = ThemeSettings::default();
        ThemeSettings {
            theme_id: update.theme_id,
            primary_color: update.primary_color.unwrap_or(defaults.primary_color),
            secondary_color: update.secondary_color.unwrap_or(defaults.secondary_color),
            accent_color: update.accent_color.unwrap_or(defaults.accent_color),
            background_color: update.background_color.unwrap_or(defaults.background_color),
        }
    }
}

pub async fn theme_settings_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<ThemeSettings> {
    let settings = ThemeService::new(pool).load().await?;
    Ok(ApiResponse::success(settings))
}

/// Unknown theme ids are rejected by deserialization
pub async fn theme_settings_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    payload: Result<Json<ThemeUpdate>, JsonRejection>,
) -> ApiResult<ThemeSettings> {
    let Json(update) = payload?;
    let settings = ThemeSettings::from(update);

    ThemeService::new(pool).save(&settings).await?;
    Ok(ApiResponse::success(settings))
}

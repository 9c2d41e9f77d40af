//! Repository for the `settings` key-value table.

use mentora_core::settings::{parse_limit, SETTING_MAX_BOOKINGS_PER_USER};
use sqlx::PgPool;

use crate::models::setting::Setting;

const COLUMNS: &str = "id, key, value, created_at, updated_at";

pub struct SettingRepo;

impl SettingRepo {
    /// Read the raw value stored under `key`.
    pub async fn get_value(pool: &PgPool, key: &str) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the value stored under `key`.
    pub async fn set_value(pool: &PgPool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let query = format!(
            "INSERT INTO settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Setting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// The global booking quota; `0` means unlimited.
    pub async fn max_bookings_per_user(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let raw = Self::get_value(pool, SETTING_MAX_BOOKINGS_PER_USER).await?;
        Ok(parse_limit(raw.as_deref()))
    }

    /// Overwrite the global booking quota.
    pub async fn set_max_bookings_per_user(pool: &PgPool, limit: i64) -> Result<i64, sqlx::Error> {
        let setting =
            Self::set_value(pool, SETTING_MAX_BOOKINGS_PER_USER, &limit.to_string()).await?;
        Ok(parse_limit(Some(&setting.value)))
    }
}

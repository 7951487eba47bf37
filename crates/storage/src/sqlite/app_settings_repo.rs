use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{AppSettingsRepository, StorageError};
use sanderson_core::model::{AppSettings, AppSettingsDraft};

use super::SqliteRepository;
use super::mapping::{ser, u8_from_i64};

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                api_key,
                api_model,
                api_base_url,
                image_model,
                pass_threshold,
                quiz_length
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let pass_threshold: i64 = row.try_get("pass_threshold").map_err(ser)?;
        let quiz_length: i64 = row.try_get("quiz_length").map_err(ser)?;

        AppSettings::from_persisted(AppSettingsDraft {
            api_key: row.try_get("api_key").map_err(ser)?,
            api_model: row.try_get("api_model").map_err(ser)?,
            api_base_url: row.try_get("api_base_url").map_err(ser)?,
            image_model: row.try_get("image_model").map_err(ser)?,
            pass_threshold: Some(u8_from_i64("pass_threshold", pass_threshold)?),
            quiz_length: Some(u8_from_i64("quiz_length", quiz_length)?),
        })
        .map(Some)
        .map_err(ser)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (
                id,
                api_key,
                api_model,
                api_base_url,
                image_model,
                pass_threshold,
                quiz_length
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                api_key = excluded.api_key,
                api_model = excluded.api_model,
                api_base_url = excluded.api_base_url,
                image_model = excluded.image_model,
                pass_threshold = excluded.pass_threshold,
                quiz_length = excluded.quiz_length
            ",
        )
        .bind(1_i64)
        .bind(settings.api_key())
        .bind(settings.api_model())
        .bind(settings.api_base_url())
        .bind(settings.image_model())
        .bind(i64::from(settings.pass_threshold().percent()))
        .bind(i64::from(settings.quiz_length().get()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

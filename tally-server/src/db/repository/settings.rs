//! Settings Repository
//!
//! The settings table holds a single record (`settings:main`).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Settings, SettingsUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "settings";
const KEY: &str = "main";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get the settings singleton, falling back to defaults if unseeded
    pub async fn get(&self) -> RepoResult<Settings> {
        let settings: Option<Settings> = self.base.db().select((TABLE, KEY)).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Apply a partial update and return the new settings
    pub async fn update(&self, data: SettingsUpdate) -> RepoResult<Settings> {
        if let Some(t) = data.default_reorder_threshold
            && t < 0
        {
            return Err(RepoError::Validation(format!(
                "Invalid reorder threshold: {}",
                t
            )));
        }

        let mut result = self
            .base
            .db()
            .query("UPSERT settings:main MERGE $data RETURN AFTER")
            .bind(("data", data))
            .await?;
        let updated: Option<Settings> = result.take(0)?;
        updated.ok_or_else(|| RepoError::Database("Failed to update settings".to_string()))
    }

    /// Seed the singleton on first start. Existing values are left alone.
    pub async fn ensure_seeded(&self) -> RepoResult<Settings> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT settings:main SET default_reorder_threshold = default_reorder_threshold ?? $default RETURN AFTER",
            )
            .bind(("default", Settings::default().default_reorder_threshold))
            .await?;
        let seeded: Option<Settings> = result.take(0)?;
        seeded.ok_or_else(|| RepoError::Database("Failed to seed settings".to_string()))
    }
}

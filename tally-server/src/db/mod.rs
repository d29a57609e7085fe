//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend) plus schema application.

pub mod models;
pub mod repository;
pub mod schema;

use shared::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "tally";
const DATABASE: &str = "tally";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database under `path` and apply schema
    pub async fn new(path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %path.display(), "Database opened (SurrealDB/RocksDB)");

        let service = Self { db };
        service.apply_schema().await?;
        Ok(service)
    }

    /// Apply DEFINE statements. Safe to run on every start.
    pub async fn apply_schema(&self) -> Result<(), AppError> {
        self.db
            .query(schema::SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");
        Ok(())
    }
}

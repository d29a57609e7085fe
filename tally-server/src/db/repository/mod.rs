//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod order;
pub mod product;
pub mod reports;
pub mod settings;
pub mod sku;
pub mod stock_history;
pub mod user;

pub use order::OrderRepository;
pub use product::ProductRepository;
pub use reports::ReportsRepository;
pub use settings::SettingsRepository;
pub use sku::SkuRepository;
pub use stock_history::StockHistoryRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "sku:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("sku", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Parse a client-supplied id into a RecordId for `table`.
///
/// Accepts both the bare key ("abc123") and the full "table:abc123" form.
/// Rejects ids that name a different table.
pub(crate) fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let key = match id.split_once(':') {
        Some((t, k)) if t == table => k,
        Some(_) => {
            return Err(RepoError::Validation(format!("Invalid {} ID: {}", table, id)));
        }
        None => id,
    };
    if key.is_empty() {
        return Err(RepoError::Validation(format!("Invalid {} ID: {}", table, id)));
    }
    Ok(RecordId::from_table_key(table, key))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_forms() {
        assert!(parse_id("sku", "abc").is_ok());
        assert!(parse_id("sku", "sku:abc").is_ok());
        assert!(parse_id("sku", "product:abc").is_err());
        assert!(parse_id("sku", "").is_err());
        assert!(parse_id("sku", "sku:").is_err());
    }
}

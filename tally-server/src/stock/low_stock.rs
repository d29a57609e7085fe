//! Low-Stock Query
//!
//! Read-only view of SKUs at or below their effective reorder threshold.
//! SKUs without their own threshold fall back to the store-wide default,
//! which is passed in explicitly rather than read inside the query.

use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub sku_id: String,
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub stock: i64,
    pub reorder_threshold: i64,
}

/// SKUs with `stock <= coalesce(reorder_threshold, default)`, lowest first
pub async fn find_low_stock(
    db: &Surreal<Db>,
    default_threshold: i64,
) -> AppResult<Vec<LowStockAlert>> {
    let mut result = db
        .query(
            r#"
            SELECT
                <string>id AS sku_id,
                <string>product AS product_id,
                product.name AS product_name,
                code AS sku,
                stock,
                (reorder_threshold ?? $default) AS reorder_threshold
            FROM sku
            WHERE stock <= (reorder_threshold ?? $default)
            ORDER BY stock, sku;
            "#,
        )
        .bind(("default", default_threshold))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let alerts: Vec<LowStockAlert> = result
        .take(0)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(alerts)
}

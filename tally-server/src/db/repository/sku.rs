//! SKU Repository
//!
//! Catalog-side CRUD for SKU variants. Stock is deliberately absent from the
//! update path: only the stock engine mutates `sku.stock`.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Sku, SkuUpdate, coerce_attributes};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use uuid::Uuid;

const TABLE: &str = "sku";

/// Bounded attempts when auto-generating a unique barcode
const BARCODE_MAX_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct SkuRepository {
    base: BaseRepository,
}

impl SkuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all SKUs ordered by code
    pub async fn find_all(&self) -> RepoResult<Vec<Sku>> {
        let skus: Vec<Sku> = self
            .base
            .db()
            .query("SELECT * FROM sku ORDER BY code")
            .await?
            .take(0)?;
        Ok(skus)
    }

    /// Find all SKUs belonging to a product
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<Sku>> {
        let thing = parse_id("product", product_id)?;
        let skus: Vec<Sku> = self
            .base
            .db()
            .query("SELECT * FROM sku WHERE product = $product ORDER BY code")
            .bind(("product", thing))
            .await?
            .take(0)?;
        Ok(skus)
    }

    /// Find SKU by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Sku>> {
        let thing = parse_id(TABLE, id)?;
        let sku: Option<Sku> = self.base.db().select(thing).await?;
        Ok(sku)
    }

    /// Find SKU by its unique code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Sku>> {
        let code_owned = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sku WHERE code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let skus: Vec<Sku> = result.take(0)?;
        Ok(skus.into_iter().next())
    }

    /// Find SKU by its unique barcode
    pub async fn find_by_barcode(&self, barcode: &str) -> RepoResult<Option<Sku>> {
        let barcode_owned = barcode.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sku WHERE barcode = $barcode LIMIT 1")
            .bind(("barcode", barcode_owned))
            .await?;
        let skus: Vec<Sku> = result.take(0)?;
        Ok(skus.into_iter().next())
    }

    /// Create a SKU. Stock starts at 0: initial inventory is booked through
    /// the stock engine so the ledger records it.
    pub async fn create(
        &self,
        product: RecordId,
        code: String,
        barcode: Option<String>,
        attributes: Option<serde_json::Value>,
        price: f64,
        reorder_threshold: Option<i64>,
    ) -> RepoResult<Sku> {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(RepoError::Validation("SKU code is required".to_string()));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(RepoError::Validation(format!("Invalid price: {}", price)));
        }
        if let Some(t) = reorder_threshold {
            if t < 0 {
                return Err(RepoError::Validation(format!(
                    "Invalid reorder threshold: {}",
                    t
                )));
            }
        }

        let attributes = coerce_attributes(attributes)
            .map_err(|e| RepoError::Validation(e.message))?;

        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "SKU code '{}' already exists",
                code
            )));
        }

        let barcode = match barcode {
            Some(b) => {
                let b = b.trim().to_string();
                if b.is_empty() {
                    return Err(RepoError::Validation("Barcode cannot be blank".to_string()));
                }
                if self.find_by_barcode(&b).await?.is_some() {
                    return Err(RepoError::Duplicate(format!(
                        "Barcode '{}' already exists",
                        b
                    )));
                }
                b
            }
            None => self.generate_barcode().await?,
        };

        let id = RecordId::from_table_key(TABLE, Uuid::new_v4().simple().to_string());
        let sku = Sku {
            id: Some(id.clone()),
            product,
            code,
            barcode,
            attributes,
            price,
            stock: 0,
            reorder_threshold,
            created_at: Utc::now().timestamp_millis(),
        };

        let mut result = self
            .base
            .db()
            .query("CREATE $thing CONTENT $data RETURN AFTER")
            .bind(("thing", id))
            .bind(("data", sku))
            .await?;
        let created: Option<Sku> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create SKU".to_string()))
    }

    /// Update a SKU's catalog fields. `stock` is not updatable here.
    pub async fn update(&self, id: &str, data: SkuUpdate) -> RepoResult<Sku> {
        let thing = parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SKU {} not found", id)))?;

        if let Some(ref new_code) = data.code {
            let new_code = new_code.trim();
            if new_code.is_empty() {
                return Err(RepoError::Validation("SKU code is required".to_string()));
            }
            if new_code != existing.code && self.find_by_code(new_code).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "SKU code '{}' already exists",
                    new_code
                )));
            }
        }
        if let Some(ref new_barcode) = data.barcode {
            if new_barcode != &existing.barcode
                && self.find_by_barcode(new_barcode).await?.is_some()
            {
                return Err(RepoError::Duplicate(format!(
                    "Barcode '{}' already exists",
                    new_barcode
                )));
            }
        }
        if let Some(price) = data.price {
            if !price.is_finite() || price < 0.0 {
                return Err(RepoError::Validation(format!("Invalid price: {}", price)));
            }
        }

        let mut merge: HashMap<&'static str, serde_json::Value> = HashMap::new();
        if let Some(code) = data.code {
            merge.insert("code", serde_json::json!(code.trim()));
        }
        if let Some(barcode) = data.barcode {
            merge.insert("barcode", serde_json::json!(barcode));
        }
        if let Some(attrs) = data.attributes {
            let attrs = coerce_attributes(Some(attrs))
                .map_err(|e| RepoError::Validation(e.message))?;
            merge.insert("attributes", serde_json::json!(attrs));
        }
        if let Some(price) = data.price {
            merge.insert("price", serde_json::json!(price));
        }
        if let Some(threshold) = data.reorder_threshold {
            if threshold < 0 {
                return Err(RepoError::Validation(format!(
                    "Invalid reorder threshold: {}",
                    threshold
                )));
            }
            merge.insert("reorder_threshold", serde_json::json!(threshold));
        }

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", merge))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SKU {} not found", id)))
    }

    /// Hard delete a SKU. Ledger entries survive as historical record.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("SKU {} not found", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Generate a unique numeric barcode.
    ///
    /// Epoch millis keep candidates monotonically increasing; three random
    /// digits break ties within a millisecond. Uniqueness is re-checked
    /// against the store with a bounded retry.
    async fn generate_barcode(&self) -> RepoResult<String> {
        for _ in 0..BARCODE_MAX_ATTEMPTS {
            let millis = Utc::now().timestamp_millis();
            let suffix: u32 = rand::thread_rng().gen_range(0..1000);
            let candidate = format!("{}{:03}", millis, suffix);
            if self.find_by_barcode(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(RepoError::Database(
            "Barcode generation exhausted retry attempts".to_string(),
        ))
    }
}

//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Product, ProductUpdate, ProductWithStock};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products with aggregate stock across their SKUs
    pub async fn find_all(&self) -> RepoResult<Vec<ProductWithStock>> {
        let products: Vec<ProductWithStock> = self
            .base
            .db()
            .query(
                r#"SELECT *,
                    math::sum((SELECT VALUE stock FROM sku WHERE product = $parent.id)) AS total_stock
                FROM product WHERE is_active = true ORDER BY name"#,
            )
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by id with aggregate stock
    pub async fn find_with_stock(&self, id: &str) -> RepoResult<Option<ProductWithStock>> {
        let thing = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT *,
                    math::sum((SELECT VALUE stock FROM sku WHERE product = $parent.id)) AS total_stock
                FROM ONLY $thing"#,
            )
            .bind(("thing", thing))
            .await?;
        let product: Option<ProductWithStock> = result.take(0)?;
        Ok(product)
    }

    /// Create a product record (SKU variants are created separately)
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        category: Option<String>,
    ) -> RepoResult<Product> {
        if name.trim().is_empty() {
            return Err(RepoError::Validation("Product name is required".to_string()));
        }

        let product = Product {
            id: None,
            name: name.trim().to_string(),
            description,
            category,
            is_active: true,
            created_at: Utc::now().timestamp_millis(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(ref name) = data.name
            && name.trim().is_empty()
        {
            return Err(RepoError::Validation("Product name is required".to_string()));
        }

        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Delete a product. Refuses while SKU variants still reference it.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count() FROM sku WHERE product = $thing GROUP ALL")
            .bind(("thing", thing.clone()))
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        if counts.first().copied().unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Product still has SKU variants".to_string(),
            ));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

//! Shared test fixtures: in-memory database plus catalog seeding.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use tally_server::db::models::Sku;
use tally_server::db::repository::{ProductRepository, SkuRepository};
use tally_server::db::schema;
use tally_server::stock::{StockAdjustment, StockEngine};

pub async fn test_db() -> Surreal<Db> {
    let db: Surreal<Db> = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db.query(schema::SCHEMA).await.unwrap().check().unwrap();
    db
}

/// Create a product with one SKU and book `stock` units through the engine
pub async fn seed_sku(db: &Surreal<Db>, code: &str, price: f64, stock: i64) -> Sku {
    let product = ProductRepository::new(db.clone())
        .create(format!("Product {code}"), None, Some("widgets".to_string()))
        .await
        .unwrap();

    let sku = SkuRepository::new(db.clone())
        .create(
            product.id.unwrap(),
            code.to_string(),
            None,
            None,
            price,
            None,
        )
        .await
        .unwrap();
    let sku_id = sku.id.clone().unwrap().to_string();

    if stock > 0 {
        let engine = StockEngine::new(db.clone());
        let (sku, _) = engine
            .adjust(StockAdjustment {
                sku_id,
                delta: stock,
                reason: "initial".to_string(),
                actor: None,
                order_ref: None,
                metadata: None,
            })
            .await
            .unwrap();
        return sku;
    }

    sku
}

//! Order Repository
//!
//! Read side only. Orders are written by the order coordinator inside its
//! transaction and are immutable afterwards.

use super::{BaseRepository, RepoResult, parse_id};
use crate::db::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders, newest first
    pub async fn find_all(&self, limit: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by its order number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number_owned = order_number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
            .bind(("number", number_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}

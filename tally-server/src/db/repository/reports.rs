//! Reports Repository
//!
//! Read-only SurrealQL aggregations over completed orders. All ranges are
//! inclusive calendar dates (UTC) supplied as YYYY-MM-DD.

use super::{BaseRepository, RepoError, RepoResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Validate date format (YYYY-MM-DD)
fn validate_date(date: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RepoError::Validation(format!("Invalid date format: {}", date)))
}

/// Resolve an inclusive [from, to] date pair into a Unix-millis range
fn date_range_millis(from: &str, to: &str) -> RepoResult<(i64, i64)> {
    let from_date = validate_date(from)?;
    let to_date = validate_date(to)?;
    if from_date > to_date {
        return Err(RepoError::Validation(format!(
            "Invalid date range: {} > {}",
            from, to
        )));
    }
    let start = from_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| RepoError::Validation(format!("Invalid date: {}", from)))?
        .and_utc()
        .timestamp_millis();
    let end = to_date
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| RepoError::Validation(format!("Invalid date: {}", to)))?
        .and_utc()
        .timestamp_millis()
        - 1;
    Ok((start, end))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub orders: i64,
    pub revenue: f64,
    pub items_sold: i64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSellingRow {
    pub sku_code: String,
    pub units_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTrendRow {
    pub day: String,
    pub orders: i64,
    pub revenue: f64,
    pub items_sold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub units_sold: i64,
    pub revenue: f64,
}

#[derive(Clone)]
pub struct ReportsRepository {
    base: BaseRepository,
}

impl ReportsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Aggregate totals over completed orders in the range
    pub async fn summary(&self, from: &str, to: &str) -> RepoResult<SalesSummary> {
        let (start, end) = date_range_millis(from, to)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $orders = (
                    SELECT total, total_items FROM order
                    WHERE created_at >= $start AND created_at <= $end
                    AND status = 'completed'
                );
                RETURN {
                    orders: count($orders),
                    revenue: math::fixed(math::sum($orders.total) OR 0, 2),
                    items_sold: math::sum($orders.total_items) OR 0,
                    avg_order_value: IF count($orders) > 0 {
                        math::fixed((math::sum($orders.total) OR 0) / count($orders), 2)
                    } ELSE { 0 }
                };
                "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let summary: Option<SalesSummary> = result.take(1)?;
        summary.ok_or_else(|| RepoError::Database("Failed to compute summary".to_string()))
    }

    /// Best sellers by units sold
    pub async fn top_selling(
        &self,
        from: &str,
        to: &str,
        limit: i64,
    ) -> RepoResult<Vec<TopSellingRow>> {
        let (start, end) = date_range_millis(from, to)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $lines = (
                    SELECT items FROM order
                    WHERE created_at >= $start AND created_at <= $end
                    AND status = 'completed'
                    SPLIT items
                );
                SELECT
                    items.sku_code AS sku_code,
                    math::sum(items.quantity) AS units_sold,
                    math::fixed(math::sum(items.line_total), 2) AS revenue
                FROM $lines
                GROUP BY sku_code
                ORDER BY units_sold DESC
                LIMIT $limit;
                "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .bind(("limit", limit))
            .await?;
        let rows: Vec<TopSellingRow> = result.take(1)?;
        Ok(rows)
    }

    /// Per-day order count, revenue, and units sold
    pub async fn daily_trend(&self, from: &str, to: &str) -> RepoResult<Vec<DailyTrendRow>> {
        let (start, end) = date_range_millis(from, to)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                SELECT
                    time::format(time::from::millis(created_at), '%Y-%m-%d') AS day,
                    count() AS orders,
                    math::fixed(math::sum(total), 2) AS revenue,
                    math::sum(total_items) AS items_sold
                FROM order
                WHERE created_at >= $start AND created_at <= $end
                AND status = 'completed'
                GROUP BY day
                ORDER BY day;
                "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let rows: Vec<DailyTrendRow> = result.take(0)?;
        Ok(rows)
    }

    /// Revenue and units grouped by the parent product's category label
    pub async fn category_breakdown(&self, from: &str, to: &str) -> RepoResult<Vec<CategoryRow>> {
        let (start, end) = date_range_millis(from, to)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $lines = (
                    SELECT items FROM order
                    WHERE created_at >= $start AND created_at <= $end
                    AND status = 'completed'
                    SPLIT items
                );
                SELECT
                    items.product.category ?? 'uncategorized' AS category,
                    math::sum(items.quantity) AS units_sold,
                    math::fixed(math::sum(items.line_total), 2) AS revenue
                FROM $lines
                GROUP BY category
                ORDER BY revenue DESC;
                "#,
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let rows: Vec<CategoryRow> = result.take(1)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_millis() {
        let (start, end) = date_range_millis("2026-01-01", "2026-01-01").unwrap();
        // One full UTC day, inclusive
        assert_eq!(end - start, 86_400_000 - 1);
    }

    #[test]
    fn test_date_range_rejects_bad_input() {
        assert!(date_range_millis("2026-1-1", "2026-01-02").is_err());
        assert!(date_range_millis("2026-01-02", "2026-01-01").is_err());
        assert!(date_range_millis("not-a-date", "2026-01-01").is_err());
    }
}

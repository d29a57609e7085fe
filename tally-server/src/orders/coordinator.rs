//! Order Transaction Coordinator
//!
//! Turns a validated order request into one atomic unit of work: per line
//! item a stock deduction plus ledger entry, then the order record itself,
//! with line snapshots and totals computed from the in-transaction SKU reads.
//! Any failure aborts everything; there is no partially applied order.

use shared::{AppError, AppResult, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use super::number::generate_order_number;
use crate::db::models::{Order, OrderCreate};
use crate::stock::{StockAdjustment, StockTxn};

#[derive(Clone)]
pub struct OrderCoordinator {
    db: Surreal<Db>,
}

impl OrderCoordinator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Create an order atomically.
    ///
    /// Validation happens before any statement touches the store. Inside the
    /// transaction each line reads its SKU, checks availability, deducts
    /// stock, and appends a ledger entry referencing the order; the order
    /// record is then created from those same in-transaction reads, so line
    /// snapshots and prices can never drift from the stock that was sold.
    pub async fn create_order(&self, data: OrderCreate, actor: Option<String>) -> AppResult<Order> {
        validate(&data)?;

        let order_number = generate_order_number();
        let order_key = Uuid::new_v4().simple().to_string();
        let order_id = RecordId::from_table_key("order", order_key.clone());
        let reason = format!("order:{}", order_number);

        let mut txn = StockTxn::new();
        let mut line_exprs = Vec::with_capacity(data.items.len());
        let mut total_exprs = Vec::with_capacity(data.items.len());
        let mut total_items: i64 = 0;

        for item in &data.items {
            let slot = txn.push_adjustment(&StockAdjustment {
                sku_id: item.sku_id.clone(),
                delta: -item.quantity,
                reason: reason.clone(),
                actor: actor.clone(),
                order_ref: Some(order_id.clone()),
                metadata: None,
            })?;

            let k = slot.index;
            line_exprs.push(format!(
                r#"{{
    sku: $sku{k}.id,
    product: $sku{k}.product,
    sku_code: $sku{k}.code,
    quantity: $qty{k},
    unit_price: $sku{k}.price,
    line_total: math::fixed($sku{k}.price * $qty{k}, 2),
    attributes: $sku{k}.attributes
}}"#
            ));
            total_exprs.push(format!("math::fixed($sku{k}.price * $qty{k}, 2)"));
            txn.bind_int(format!("qty{k}"), item.quantity);
            total_items += item.quantity;
        }

        // Explicit tax amount wins over a rate; both default to zero
        let tax_expr = if let Some(tax) = data.tax {
            txn.bind_float("tax_amount", crate::utils::round2(tax));
            "$tax_amount".to_string()
        } else if let Some(rate) = data.tax_rate {
            txn.bind_float("tax_rate", rate);
            "math::fixed($sub_total * $tax_rate, 2)".to_string()
        } else {
            "0".to_string()
        };

        txn.push_statement(format!(
            r#"LET $sub_total = math::fixed({sum}, 2);
LET $tax = {tax_expr};
CREATE type::thing('order', $order_key) CONTENT {{
    order_number: $order_number,
    items: [{items}],
    sub_total: $sub_total,
    tax: $tax,
    total: math::fixed($sub_total + $tax, 2),
    total_items: $total_items,
    status: 'completed',
    customer: $customer,
    created_by: $created_by,
    metadata: $order_meta,
    created_at: $order_now
}};"#,
            sum = total_exprs.join(" + "),
            items = line_exprs.join(", "),
        ));

        txn.bind_str("order_key", order_key);
        txn.bind_str("order_number", order_number.clone());
        txn.bind_int("total_items", total_items);
        txn.bind_json(
            "customer",
            data.customer
                .as_ref()
                .map(|c| serde_json::json!(c))
                .unwrap_or(serde_json::Value::Null),
        );
        txn.bind_opt_str("created_by", actor);
        txn.bind_json(
            "order_meta",
            data.metadata.clone().unwrap_or(serde_json::Value::Null),
        );
        txn.bind_int("order_now", chrono::Utc::now().timestamp_millis());

        txn.execute(&self.db).await?;

        let order: Option<Order> = self
            .db
            .select(order_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        let order = order.ok_or_else(|| {
            AppError::internal(format!(
                "Committed order {} could not be read back",
                order_number
            ))
        })?;

        tracing::info!(
            order_number = %order.order_number,
            total = order.total,
            items = order.items.len(),
            "Order created"
        );
        Ok(order)
    }
}

fn validate(data: &OrderCreate) -> AppResult<()> {
    if data.items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    for item in &data.items {
        if item.quantity < 1 {
            return Err(AppError::with_message(
                ErrorCode::InvalidQuantity,
                format!("Invalid quantity {} for SKU {}", item.quantity, item.sku_id),
            ));
        }
    }
    if let Some(tax) = data.tax {
        if !tax.is_finite() || tax < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::InvalidTax,
                format!("Invalid tax amount: {}", tax),
            ));
        }
    }
    if let Some(rate) = data.tax_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::InvalidTax,
                format!("Invalid tax rate: {}", rate),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItemInput;

    fn order_one(sku_id: &str, quantity: i64) -> OrderCreate {
        OrderCreate {
            items: vec![OrderItemInput {
                sku_id: sku_id.to_string(),
                quantity,
            }],
            customer: None,
            tax: None,
            tax_rate: None,
            metadata: None,
        }
    }

    #[test]
    fn test_validate_rejects_empty_order() {
        let data = OrderCreate {
            items: vec![],
            customer: None,
            tax: None,
            tax_rate: None,
            metadata: None,
        };
        assert_eq!(validate(&data).unwrap_err().code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_validate_rejects_bad_quantity() {
        assert_eq!(
            validate(&order_one("sku:a", 0)).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
        assert_eq!(
            validate(&order_one("sku:a", -2)).unwrap_err().code,
            ErrorCode::InvalidQuantity
        );
    }

    #[test]
    fn test_validate_rejects_bad_tax() {
        let mut data = order_one("sku:a", 1);
        data.tax = Some(-0.5);
        assert_eq!(validate(&data).unwrap_err().code, ErrorCode::InvalidTax);

        let mut data = order_one("sku:a", 1);
        data.tax_rate = Some(f64::NAN);
        assert_eq!(validate(&data).unwrap_err().code, ErrorCode::InvalidTax);
    }
}

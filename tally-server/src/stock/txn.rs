//! Stock Transaction Builder
//!
//! Accumulates per-SKU adjustment statements and executes them as a single
//! `BEGIN TRANSACTION … COMMIT TRANSACTION` query. Validation failures inside
//! the database THROW machine-parsable markers (`SKU_NOT_FOUND:<id>`,
//! `INSUFFICIENT_STOCK:<code>`) which are mapped back to typed errors here,
//! so a failed batch leaves no partial writes behind.

use chrono::Utc;
use shared::{AppError, AppResult};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use super::StockAdjustment;

const SKU_NOT_FOUND_MARKER: &str = "SKU_NOT_FOUND:";
const INSUFFICIENT_STOCK_MARKER: &str = "INSUFFICIENT_STOCK:";

/// Bound values collected alongside the statements
enum BindValue {
    Str(String),
    OptStr(Option<String>),
    Int(i64),
    Float(f64),
    Record(RecordId),
    OptRecord(Option<RecordId>),
    Json(serde_json::Value),
}

/// Handle to one adjustment inside the transaction.
///
/// `index` names the `$sku<k>` / `$new<k>` variables, so later statements in
/// the same transaction can reference the in-transaction SKU read.
pub struct TxnSlot {
    pub index: usize,
    pub sku_id: RecordId,
    pub history_id: RecordId,
}

/// Statement builder for one stock unit of work
pub struct StockTxn {
    statements: Vec<String>,
    bindings: Vec<(String, BindValue)>,
    next_index: usize,
}

impl StockTxn {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
            bindings: Vec::new(),
            next_index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0 && self.statements.is_empty()
    }

    /// Append one stock adjustment: read, validate, update, ledger entry.
    ///
    /// Record ids for the SKU and the new ledger entry are pre-allocated so
    /// results can be fetched after commit without parsing statement output.
    pub fn push_adjustment(&mut self, adj: &StockAdjustment) -> AppResult<TxnSlot> {
        let k = self.next_index;
        self.next_index += 1;

        let sku_key = sku_key(&adj.sku_id)?;
        let history_key = Uuid::new_v4().simple().to_string();

        self.statements.push(format!(
            r#"LET $sku{k} = (SELECT * FROM ONLY type::thing('sku', $sku_id{k}));
IF $sku{k} == NONE {{ THROW "{SKU_NOT_FOUND_MARKER}" + $sku_id{k} }};
LET $new{k} = $sku{k}.stock + $delta{k};
IF $new{k} < 0 {{ THROW "{INSUFFICIENT_STOCK_MARKER}" + $sku{k}.code }};
UPDATE $sku{k}.id SET stock = $new{k};
CREATE type::thing('stock_history', $hist_id{k}) CONTENT {{
    sku: $sku{k}.id,
    product: $sku{k}.product,
    change: $delta{k},
    previous_stock: $sku{k}.stock,
    new_stock: $new{k},
    reason: $reason{k},
    order: $order{k},
    actor: $actor{k},
    metadata: $meta{k},
    created_at: $now{k}
}};"#
        ));

        self.bind(format!("sku_id{k}"), BindValue::Str(sku_key.clone()));
        self.bind(format!("delta{k}"), BindValue::Int(adj.delta));
        self.bind(format!("reason{k}"), BindValue::Str(adj.reason.clone()));
        self.bind(
            format!("order{k}"),
            BindValue::OptRecord(adj.order_ref.clone()),
        );
        self.bind(format!("actor{k}"), BindValue::OptStr(adj.actor.clone()));
        self.bind(
            format!("meta{k}"),
            BindValue::Json(adj.metadata.clone().unwrap_or(serde_json::Value::Null)),
        );
        self.bind(
            format!("now{k}"),
            BindValue::Int(Utc::now().timestamp_millis()),
        );
        self.bind(format!("hist_id{k}"), BindValue::Str(history_key.clone()));

        Ok(TxnSlot {
            index: k,
            sku_id: RecordId::from_table_key("sku", sku_key),
            history_id: RecordId::from_table_key("stock_history", history_key),
        })
    }

    /// Append a raw statement (used by the order coordinator to create the
    /// order record from in-transaction SKU reads)
    pub fn push_statement(&mut self, statement: String) {
        self.statements.push(statement);
    }

    pub fn bind_str(&mut self, name: impl Into<String>, value: String) {
        self.bind(name.into(), BindValue::Str(value));
    }

    pub fn bind_int(&mut self, name: impl Into<String>, value: i64) {
        self.bind(name.into(), BindValue::Int(value));
    }

    pub fn bind_float(&mut self, name: impl Into<String>, value: f64) {
        self.bind(name.into(), BindValue::Float(value));
    }

    pub fn bind_record(&mut self, name: impl Into<String>, value: RecordId) {
        self.bind(name.into(), BindValue::Record(value));
    }

    pub fn bind_json(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.bind(name.into(), BindValue::Json(value));
    }

    pub fn bind_opt_str(&mut self, name: impl Into<String>, value: Option<String>) {
        self.bind(name.into(), BindValue::OptStr(value));
    }

    fn bind(&mut self, name: String, value: BindValue) {
        self.bindings.push((name, value));
    }

    /// Execute the whole batch atomically. Any error aborts every statement.
    pub async fn execute(self, db: &Surreal<Db>) -> AppResult<()> {
        if self.statements.is_empty() {
            return Err(AppError::validation("Empty stock transaction"));
        }

        let sql = format!(
            "BEGIN TRANSACTION;\n{}\nCOMMIT TRANSACTION;",
            self.statements.join("\n")
        );

        let mut query = db.query(sql);
        for (name, value) in self.bindings {
            query = match value {
                BindValue::Str(v) => query.bind((name, v)),
                BindValue::OptStr(v) => query.bind((name, v)),
                BindValue::Int(v) => query.bind((name, v)),
                BindValue::Float(v) => query.bind((name, v)),
                BindValue::Record(v) => query.bind((name, v)),
                BindValue::OptRecord(v) => query.bind((name, v)),
                BindValue::Json(v) => query.bind((name, v)),
            };
        }

        let response = query.await.map_err(map_txn_error)?;
        response.check().map_err(map_txn_error)?;
        Ok(())
    }
}

impl Default for StockTxn {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the bare key from a client-supplied SKU id
fn sku_key(id: &str) -> AppResult<String> {
    let key = match id.split_once(':') {
        Some(("sku", k)) => k,
        Some(_) => {
            return Err(AppError::validation(format!("Invalid SKU ID: {}", id)));
        }
        None => id,
    };
    if key.is_empty() {
        return Err(AppError::validation(format!("Invalid SKU ID: {}", id)));
    }
    Ok(key.to_string())
}

/// Map a transaction failure to a typed error by scanning for THROW markers
fn map_txn_error(err: surrealdb::Error) -> AppError {
    let msg = err.to_string();

    if let Some(rest) = msg.split(SKU_NOT_FOUND_MARKER).nth(1) {
        let id = marker_payload(rest);
        return AppError::sku_not_found(id);
    }
    if let Some(rest) = msg.split(INSUFFICIENT_STOCK_MARKER).nth(1) {
        let code = marker_payload(rest);
        return AppError::insufficient_stock(code);
    }

    tracing::error!(error = %msg, "Stock transaction aborted");
    AppError::transaction_aborted(msg)
}

/// THROW payloads end at the first quote or whitespace in the error string
fn marker_payload(rest: &str) -> &str {
    rest.split(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_sku_key_forms() {
        assert_eq!(sku_key("abc").unwrap(), "abc");
        assert_eq!(sku_key("sku:abc").unwrap(), "abc");
        assert!(sku_key("product:abc").is_err());
        assert!(sku_key("").is_err());
    }

    #[test]
    fn test_marker_payload_stops_at_quote() {
        assert_eq!(marker_payload("WIDGET-RED\" at line 3"), "WIDGET-RED");
        assert_eq!(marker_payload("abc123 more"), "abc123");
    }

    #[test]
    fn test_map_txn_error_markers() {
        let err = surrealdb::Error::Api(surrealdb::error::Api::Query(
            "An error occurred: SKU_NOT_FOUND:abc123".to_string(),
        ));
        assert_eq!(map_txn_error(err).code, ErrorCode::SkuNotFound);

        let err = surrealdb::Error::Api(surrealdb::error::Api::Query(
            "An error occurred: INSUFFICIENT_STOCK:WIDGET-XL".to_string(),
        ));
        let mapped = map_txn_error(err);
        assert_eq!(mapped.code, ErrorCode::InsufficientStock);
        assert!(mapped.message.contains("WIDGET-XL"));
    }
}

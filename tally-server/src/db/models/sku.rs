//! SKU Model
//!
//! A SKU is one sellable variant of a product. Its `stock` field is only
//! ever written by the stock engine; repositories and handlers treat it as
//! read-only.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use std::collections::HashMap;
use surrealdb::RecordId;

pub type SkuId = RecordId;

/// SKU model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SkuId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Unique human-readable code, e.g. "TSHIRT-RED-M"
    pub code: String,
    /// Unique scannable barcode, auto-generated when absent
    pub barcode: String,
    /// Variant attributes, e.g. {"color": "red", "size": "M"}
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub price: f64,
    pub stock: i64,
    /// Per-SKU reorder threshold; falls back to the global default when unset
    #[serde(default)]
    pub reorder_threshold: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

/// Create SKU payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuCreate {
    /// Owning product id ("product:xyz")
    pub product: String,
    pub code: String,
    /// Omit to auto-generate
    pub barcode: Option<String>,
    /// JSON object of scalar values; coerced to trimmed strings
    pub attributes: Option<serde_json::Value>,
    pub price: f64,
    #[serde(default)]
    pub initial_stock: Option<i64>,
    pub reorder_threshold: Option<i64>,
}

/// SKU seed used when cascade-creating variants from a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuSeed {
    pub code: String,
    pub barcode: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub price: f64,
    #[serde(default)]
    pub initial_stock: Option<i64>,
    pub reorder_threshold: Option<i64>,
}

/// Update SKU payload (non-stock fields only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_threshold: Option<i64>,
}

/// Coerce a JSON attribute object into a string→string map.
///
/// Scalars are stringified and trimmed; arrays, objects and nulls are
/// rejected so the stored map stays flat.
pub fn coerce_attributes(value: Option<serde_json::Value>) -> AppResult<HashMap<String, String>> {
    let Some(value) = value else {
        return Ok(HashMap::new());
    };

    let serde_json::Value::Object(map) = value else {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidAttributes,
            "attributes must be a JSON object",
        ));
    };

    let mut out = HashMap::with_capacity(map.len());
    for (key, value) in map {
        let coerced = match value {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(AppError::with_message(
                    shared::ErrorCode::InvalidAttributes,
                    format!("attribute '{}' must be a scalar value", key),
                ));
            }
        };
        out.insert(key.trim().to_string(), coerced);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_attributes_scalars() {
        let attrs =
            coerce_attributes(Some(json!({"color": " red ", "size": 42, "organic": true})))
                .unwrap();
        assert_eq!(attrs.get("color").unwrap(), "red");
        assert_eq!(attrs.get("size").unwrap(), "42");
        assert_eq!(attrs.get("organic").unwrap(), "true");
    }

    #[test]
    fn test_coerce_attributes_rejects_nested() {
        assert!(coerce_attributes(Some(json!({"sizes": [1, 2]}))).is_err());
        assert!(coerce_attributes(Some(json!({"meta": {"a": 1}}))).is_err());
        assert!(coerce_attributes(Some(json!({"color": null}))).is_err());
    }

    #[test]
    fn test_coerce_attributes_rejects_non_object() {
        assert!(coerce_attributes(Some(json!("red"))).is_err());
        assert!(coerce_attributes(Some(json!([1, 2]))).is_err());
    }

    #[test]
    fn test_coerce_attributes_none() {
        assert!(coerce_attributes(None).unwrap().is_empty());
    }
}

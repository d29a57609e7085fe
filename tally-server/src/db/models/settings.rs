//! Store Settings Model
//!
//! Singleton record (`settings:main`) holding store-wide knobs.

use serde::{Deserialize, Serialize};

/// Global store settings singleton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Fallback low-stock threshold for SKUs without their own
    pub default_reorder_threshold: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_reorder_threshold: 5,
        }
    }
}

/// Settings update payload (partial)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_reorder_threshold: Option<i64>,
}

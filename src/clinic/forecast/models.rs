//! 销售预测响应

use serde::{Deserialize, Serialize};

/// 预测曲线上的一天
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub predicted_sales: f64,
}

/// 补货建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySuggestion {
    pub product_name: String,
    pub current_stock: i64,
    pub estimated_sales_30_days: i64,
    pub suggestion: String,
}

/// `/forecast/sales` 的两种响应：数据不足时只有 `message`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Unavailable {
        message: String,
    },
    Ready {
        forecast: Vec<ForecastPoint>,
        #[serde(default)]
        summary: Option<String>,
        #[serde(default, deserialize_with = "crate::clinic::types::deserialize_vec_or_null")]
        inventory_suggestions: Vec<InventorySuggestion>,
    },
}

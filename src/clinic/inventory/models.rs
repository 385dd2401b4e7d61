//! 库存与销售数据结构

use crate::clinic::types::{deserialize_vec_or_null, Identified};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// 商品（有库存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

/// 新建/更新商品请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

/// 服务（无库存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

/// 新建/更新服务请求体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// 销售明细引用的是商品还是服务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Product,
    Service,
}

/// 销售明细
///
/// `price` 是成交时的价格快照，之后商品调价不影响历史销售。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: i64,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
    pub quantity: u32,
    pub price: f64,
}

impl SaleItem {
    /// 明细指向的实体；两者都缺失时返回 None
    ///
    /// 只按字段是否存在判断，`Some(0)` 也视为有效引用（后端分配的 id 从 1 开始）。
    pub fn target(&self) -> Option<(ItemKind, i64)> {
        match (self.product_id, self.service_id) {
            (Some(id), _) => Some((ItemKind::Product, id)),
            (None, Some(id)) => Some((ItemKind::Service, id)),
            (None, None) => None,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// 销售记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub items: Vec<SaleItem>,
    pub total: f64,
    /// ISO 日期时间字符串
    pub date: String,
}

/// 新建销售明细（不含 id，product_id/service_id 恰好有一个）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSaleItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    pub quantity: u32,
    pub price: f64,
}

/// 新建销售请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSale {
    pub items: Vec<NewSaleItem>,
    pub total: f64,
    pub date: String,
}

impl Identified for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Service {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Sale {
    fn id(&self) -> i64 {
        self.id
    }
}

/// 按巴西雷亚尔格式化金额，例如 `R$ 1.234,50`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let integer = (cents / 100).to_formatted_string(&Locale::pt);
    let fraction = cents % 100;

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, integer, fraction)
}

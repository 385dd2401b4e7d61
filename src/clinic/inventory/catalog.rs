//! 目录条目契约
//!
//! 通用增删改管理器只依赖这里声明的能力：id、显示名、重名检查、表格列和在状态中的位置。

use crate::clinic::inventory::api::{PRODUCTS_PATH, SERVICES_PATH};
use crate::clinic::inventory::models::{format_brl, Product, ProductDraft, Service, ServiceDraft};
use crate::clinic::notifier::messages;
use crate::clinic::state::AppState;
use crate::clinic::types::Identified;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 表格列：表头 + 取值函数
pub struct Column<T> {
    pub header: &'static str,
    pub accessor: fn(&T) -> String,
}

/// 表单提交的数据（不含 id）
pub trait CatalogDraft: Serialize + Clone + Default + Send + Sync + 'static {
    fn name(&self) -> &str;

    /// 字段级校验，返回内联错误文本
    fn validate(&self) -> Result<(), String>;
}

/// 可被通用增删改管理器管理的目录条目
pub trait CatalogItem: Identified + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: CatalogDraft;

    /// 用户可见的类型名，例如 "Produto"
    const LABEL: &'static str;
    /// 集合路径，例如 "/inventory/products"
    const ENDPOINT: &'static str;
    /// 重名时的内联错误
    const DUPLICATE_MESSAGE: &'static str;

    fn name(&self) -> &str;

    /// 编辑时用于预填表单
    fn to_draft(&self) -> Self::Draft;

    fn columns() -> Vec<Column<Self>>;

    fn collection(state: &AppState) -> &Vec<Self>;

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self>;

    /// 名称是否与其它条目重复（忽略大小写，排除正在编辑的条目）
    fn is_duplicate_name(items: &[Self], name: &str, editing_id: Option<i64>) -> bool {
        let wanted = name.to_lowercase();
        items
            .iter()
            .any(|item| item.name().to_lowercase() == wanted && Some(item.id()) != editing_id)
    }
}

fn validate_name_and_price(name: &str, price: f64) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(messages::REQUIRED_NAME.to_string());
    }
    if !price.is_finite() || price < 0.0 {
        return Err(messages::INVALID_PRICE.to_string());
    }
    Ok(())
}

impl CatalogDraft for ProductDraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), String> {
        validate_name_and_price(&self.name, self.price)?;
        if self.stock < 0 {
            return Err(messages::INVALID_STOCK.to_string());
        }
        Ok(())
    }
}

impl CatalogDraft for ServiceDraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), String> {
        validate_name_and_price(&self.name, self.price)
    }
}

impl CatalogItem for Product {
    type Draft = ProductDraft;

    const LABEL: &'static str = "Produto";
    const ENDPOINT: &'static str = PRODUCTS_PATH;
    const DUPLICATE_MESSAGE: &'static str = "Já existe um produto com este nome.";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Nome",
                accessor: |p| p.name.clone(),
            },
            Column {
                header: "Preço",
                accessor: |p| format_brl(p.price),
            },
            Column {
                header: "Estoque",
                accessor: |p| p.stock.to_string(),
            },
        ]
    }

    fn collection(state: &AppState) -> &Vec<Self> {
        &state.products
    }

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
        &mut state.products
    }
}

impl CatalogItem for Service {
    type Draft = ServiceDraft;

    const LABEL: &'static str = "Serviço";
    const ENDPOINT: &'static str = SERVICES_PATH;
    const DUPLICATE_MESSAGE: &'static str = "Já existe um serviço com este nome.";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> ServiceDraft {
        ServiceDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Nome",
                accessor: |s| s.name.clone(),
            },
            Column {
                header: "Preço",
                accessor: |s| format_brl(s.price),
            },
        ]
    }

    fn collection(state: &AppState) -> &Vec<Self> {
        &state.services
    }

    fn collection_mut(state: &mut AppState) -> &mut Vec<Self> {
        &mut state.services
    }
}

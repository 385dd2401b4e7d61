//! 库存 HTTP API：商品、服务、销售

use crate::clinic::error::Result;
use crate::clinic::gateway::RestGateway;
use crate::clinic::inventory::catalog::CatalogItem;
use crate::clinic::inventory::models::{NewSale, Product, Sale, Service};
use crate::clinic::types::Paged;
use tracing::info;

pub const PRODUCTS_PATH: &str = "/inventory/products";
pub const SERVICES_PATH: &str = "/inventory/services";
pub const SALES_PATH: &str = "/inventory/sales";

#[derive(Clone)]
pub struct InventoryApi {
    gateway: RestGateway,
}

impl InventoryApi {
    pub fn new(gateway: RestGateway) -> Self {
        Self { gateway }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.list_catalog::<Product>().await
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.list_catalog::<Service>().await
    }

    pub async fn list_catalog<T: CatalogItem>(&self) -> Result<Vec<T>> {
        let items: Vec<T> = self.gateway.list(T::ENDPOINT).await?;
        info!("[InventoryAPI] ✅ {} 列表响应，条目数: {}", T::LABEL, items.len());
        Ok(items)
    }

    pub async fn create_catalog<T: CatalogItem>(&self, draft: &T::Draft) -> Result<T> {
        self.gateway.create(T::ENDPOINT, draft).await
    }

    pub async fn update_catalog<T: CatalogItem>(&self, id: i64, draft: &T::Draft) -> Result<T> {
        self.gateway.update(T::ENDPOINT, id, draft).await
    }

    pub async fn delete_catalog<T: CatalogItem>(&self, id: i64) -> Result<()> {
        self.gateway.delete(T::ENDPOINT, id).await
    }

    /// 全量销售记录（后端默认窗口）
    pub async fn list_sales(&self) -> Result<Vec<Sale>> {
        let sales: Vec<Sale> = self.gateway.list(SALES_PATH).await?;
        info!("[InventoryAPI] ✅ 销售列表响应，条目数: {}", sales.len());
        Ok(sales)
    }

    /// 分页销售记录
    pub async fn list_sales_page(&self, skip: usize, limit: usize) -> Result<Paged<Sale>> {
        self.gateway.list_paged(SALES_PATH, skip, limit).await
    }

    pub async fn create_sale(&self, sale: &NewSale) -> Result<Sale> {
        self.gateway.create(SALES_PATH, sale).await
    }
}

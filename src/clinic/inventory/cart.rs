//! 销售购物车
//!
//! 把选中的商品/服务聚合成明细，一次性提交为一笔销售。
//! 加购时按库存上限做前置检查，真正的扣减库存由后端完成，本地从不修改 `Product.stock`。

use crate::clinic::error::{ClinicError, Result};
use crate::clinic::guard::MutationGuard;
use crate::clinic::inventory::api::InventoryApi;
use crate::clinic::inventory::models::{ItemKind, NewSale, NewSaleItem, Product, Sale, Service};
use crate::clinic::notifier::{messages, Notifier};
use crate::clinic::sync::Resync;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 购物车明细，以 (类型, id) 为键
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub kind: ItemKind,
    pub id: i64,
    pub name: String,
    /// 加入购物车时的价格快照
    pub price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

pub struct SaleBuilder {
    api: InventoryApi,
    resync: Arc<dyn Resync>,
    notifier: Arc<dyn Notifier>,
    guard: MutationGuard,
    lines: Vec<CartLine>,
}

impl SaleBuilder {
    pub fn new(api: InventoryApi, resync: Arc<dyn Resync>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            resync,
            notifier,
            guard: MutationGuard::new(),
            lines: Vec::new(),
        }
    }

    /// 与其它控制器共用同一个防重入标志
    pub fn with_guard(mut self, guard: MutationGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn quantity_of(&self, kind: ItemKind, id: i64) -> u32 {
        self.lines
            .iter()
            .find(|line| line.kind == kind && line.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// 每次都从明细重新计算，不缓存
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// 加入商品，数量已达库存时拒绝并提示
    pub async fn add_product(&mut self, product: &Product) -> Result<u32> {
        let current = self.quantity_of(ItemKind::Product, product.id);
        if product.stock <= i64::from(current) {
            warn!(
                "[Cart] 商品 {} 库存不足，库存: {}, 购物车数量: {}",
                product.id, product.stock, current
            );
            self.notifier
                .alert(messages::PRODUCT_OUT_OF_STOCK.to_string())
                .await;
            return Err(ClinicError::OutOfStock {
                product_id: product.id,
                stock: product.stock,
            });
        }
        Ok(self.push(ItemKind::Product, product.id, &product.name, product.price))
    }

    /// 加入服务（无库存限制）
    pub fn add_service(&mut self, service: &Service) -> u32 {
        self.push(ItemKind::Service, service.id, &service.name, service.price)
    }

    fn push(&mut self, kind: ItemKind, id: i64, name: &str, price: f64) -> u32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.kind == kind && line.id == id)
        {
            line.quantity += 1;
            return line.quantity;
        }

        self.lines.push(CartLine {
            kind,
            id,
            name: name.to_string(),
            price,
            quantity: 1,
        });
        1
    }

    /// 移除整条明细
    pub fn remove(&mut self, kind: ItemKind, id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !(line.kind == kind && line.id == id));
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// 构造销售请求体，每条明细恰好设置 product_id 或 service_id 之一
    pub fn build_sale(&self, date: String) -> NewSale {
        let items = self
            .lines
            .iter()
            .map(|line| NewSaleItem {
                product_id: (line.kind == ItemKind::Product).then_some(line.id),
                service_id: (line.kind == ItemKind::Service).then_some(line.id),
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        NewSale {
            items,
            total: self.total(),
            date,
        }
    }

    /// 提交销售
    ///
    /// 空购物车直接返回 `Ok(None)`。成功后清空购物车、全量同步并提示；失败时保留购物车以便重试。
    pub async fn finalize(&mut self) -> Result<Option<Sale>> {
        if self.lines.is_empty() {
            return Ok(None);
        }
        let _permit = self.guard.acquire("finalize_sale")?;

        let sale = self.build_sale(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        info!(
            "[Cart] 📤 提交销售，明细数: {}, 总额: {:.2}",
            sale.items.len(),
            sale.total
        );

        match self.api.create_sale(&sale).await {
            Ok(created) => {
                self.lines.clear();
                self.resync.refetch_all().await;
                info!("[Cart] ✅ 销售 {} 已完成", created.id);
                self.notifier.alert(messages::SALE_FINALIZED.to_string()).await;
                Ok(Some(created))
            }
            Err(e) => {
                error!("[Cart] 提交销售失败: {}", e);
                self.notifier.alert(messages::SALE_FAILED.to_string()).await;
                Err(e)
            }
        }
    }
}

//! 销售历史分页
//!
//! 每次翻页：Loading → Loaded / Failed。失败时保留上一页的数据和页码，
//! 保证显示的页码与显示的数据一致。

use crate::clinic::error::{ClinicError, Result};
use crate::clinic::inventory::api::InventoryApi;
use crate::clinic::inventory::models::{ItemKind, Product, Sale, SaleItem, Service};
use crate::clinic::notifier::{messages, Notifier};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

pub struct SalesHistory {
    api: InventoryApi,
    notifier: Arc<dyn Notifier>,
    page_size: usize,
    /// 当前显示的页码（从 1 开始）
    page: usize,
    state: HistoryState,
    sales: Vec<Sale>,
    total_count: Option<u64>,
}

impl SalesHistory {
    pub fn new(api: InventoryApi, notifier: Arc<dyn Notifier>, page_size: usize) -> Self {
        Self {
            api,
            notifier,
            page_size: page_size.max(1),
            page: 1,
            state: HistoryState::Idle,
            sales: Vec::new(),
            total_count: None,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// 服务器通过 X-Total-Count 返回的总数
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// 加载指定页，页码小于 1 时按第 1 页处理
    pub async fn load_page(&mut self, page: usize) -> Result<()> {
        let page = page.max(1);
        let skip = (page - 1).checked_mul(self.page_size).ok_or_else(|| {
            warn!("[SalesHistory] 页码 {} 超出范围", page);
            ClinicError::Validation(format!("页码超出范围: {}", page))
        })?;
        self.state = HistoryState::Loading;
        info!(
            "[SalesHistory] 📡 加载第 {} 页 (skip={}, limit={})",
            page, skip, self.page_size
        );

        match self.api.list_sales_page(skip, self.page_size).await {
            Ok(paged) => {
                info!(
                    "[SalesHistory] ✅ 第 {} 页加载完成，条目数: {}, 总数: {:?}",
                    page,
                    paged.items.len(),
                    paged.total_count
                );
                self.sales = paged.items;
                self.total_count = paged.total_count;
                self.page = page;
                self.state = HistoryState::Loaded;
                Ok(())
            }
            Err(e) => {
                error!("[SalesHistory] 加载第 {} 页失败: {}", page, e);
                self.state = HistoryState::Failed;
                self.notifier
                    .alert(messages::SALES_HISTORY_FAILED.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// 重新加载当前页
    pub async fn reload(&mut self) -> Result<()> {
        self.load_page(self.page).await
    }

    /// 有下一页时翻页，否则什么都不做
    pub async fn next(&mut self) -> Result<()> {
        if !self.has_next() {
            return Ok(());
        }
        self.load_page(self.page + 1).await
    }

    pub async fn prev(&mut self) -> Result<()> {
        if !self.has_prev() {
            return Ok(());
        }
        self.load_page(self.page - 1).await
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// 有总数时按总页数判断；没有时只要当前页是满的就允许下一页
    pub fn has_next(&self) -> bool {
        match self.total_pages() {
            Some(total) => self.page < total,
            None => true,
        }
    }

    /// 总页数（至少 1）；服务器未提供总数且当前页是满页时未知
    pub fn total_pages(&self) -> Option<usize> {
        if let Some(total) = self.total_count {
            let total = usize::try_from(total).unwrap_or(usize::MAX);
            return Some(total.div_ceil(self.page_size).max(1));
        }
        if self.sales.len() < self.page_size {
            Some(self.page)
        } else {
            None
        }
    }

    /// 只有一页（或没有数据）时不显示翻页控件
    pub fn show_pager(&self) -> bool {
        self.has_prev() || self.has_next()
    }
}

/// 销售明细的显示名，找不到对应条目时给出占位文本
pub fn describe_sale_item(item: &SaleItem, products: &[Product], services: &[Service]) -> String {
    match item.target() {
        Some((ItemKind::Product, id)) => products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Produto não encontrado".to_string()),
        Some((ItemKind::Service, id)) => services
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Serviço não encontrado".to_string()),
        None => "Item desconhecido".to_string(),
    }
}

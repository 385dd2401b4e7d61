//! 内存中的应用状态
//!
//! 五个集合只由 `DataSyncer` 持有，其它组件通过窄接口读取或按 ID 合并。

use crate::clinic::appointments::models::Appointment;
use crate::clinic::inventory::models::{Product, Sale, Service};
use crate::clinic::patients::models::Client;
use crate::clinic::types::Identified;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 全部本地集合，是后端数据的尽力镜像
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub clients: Vec<Client>,
    pub appointments: Vec<Appointment>,
    pub products: Vec<Product>,
    pub services: Vec<Service>,
    pub sales: Vec<Sale>,
}

pub type SharedState = Arc<RwLock<AppState>>;

/// 按 ID 替换已存在的条目，不存在时追加
///
/// 保证同一 ID 在列表中只出现一次。
pub fn upsert_by_id<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// 只替换，不追加；返回是否找到
pub fn replace_by_id<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => {
            *existing = item;
            true
        }
        None => false,
    }
}

/// 按 ID 删除，返回是否删除了条目
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

//! 全量数据同步
//!
//! 启动时并发拉取五个集合，之后由各页面在复杂变更后调用 `refetch_all` 重新同步。

use crate::clinic::appointments::api::AppointmentApi;
use crate::clinic::gateway::RestGateway;
use crate::clinic::inventory::api::InventoryApi;
use crate::clinic::patients::api::PatientApi;
use crate::clinic::state::{AppState, SharedState};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// 全量同步能力（给购物车等组件的窄回调）
#[async_trait]
pub trait Resync: Send + Sync {
    /// 丢弃本地集合并从后端全量重新拉取
    async fn refetch_all(&self) -> SyncReport;
}

/// 一次全量同步的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// 拉取失败、保持旧数据的集合
    pub failed: Vec<&'static str>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 五个集合的唯一持有者
pub struct DataSyncer {
    state: SharedState,
    patients: PatientApi,
    appointments: AppointmentApi,
    inventory: InventoryApi,
}

impl DataSyncer {
    pub fn new(gateway: RestGateway) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            patients: PatientApi::new(gateway.clone()),
            appointments: AppointmentApi::new(gateway.clone()),
            inventory: InventoryApi::new(gateway),
        }
    }

    /// 共享状态句柄
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// 当前状态的只读拷贝
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// 并发拉取五个集合，全部返回后再写入
    ///
    /// 单个集合失败只记录日志，该集合保持原值，其它集合照常更新。
    pub async fn fetch_all(&self) -> SyncReport {
        info!("[DataSync] 🔄 开始全量同步...");

        let (clients, appointments, products, services, sales) = tokio::join!(
            self.patients.list_clients(),
            self.appointments.list(),
            self.inventory.list_products(),
            self.inventory.list_services(),
            self.inventory.list_sales(),
        );

        let mut report = SyncReport::default();
        let mut state = self.state.write().await;

        match clients {
            Ok(v) => state.clients = v,
            Err(e) => {
                error!("[DataSync] 拉取客户失败: {}", e);
                report.failed.push("clients");
            }
        }
        match appointments {
            Ok(v) => state.appointments = v,
            Err(e) => {
                error!("[DataSync] 拉取预约失败: {}", e);
                report.failed.push("appointments");
            }
        }
        match products {
            Ok(v) => state.products = v,
            Err(e) => {
                error!("[DataSync] 拉取商品失败: {}", e);
                report.failed.push("products");
            }
        }
        match services {
            Ok(v) => state.services = v,
            Err(e) => {
                error!("[DataSync] 拉取服务失败: {}", e);
                report.failed.push("services");
            }
        }
        match sales {
            Ok(v) => state.sales = v,
            Err(e) => {
                error!("[DataSync] 拉取销售记录失败: {}", e);
                report.failed.push("sales");
            }
        }

        info!(
            "[DataSync] 全量同步完成 - 客户: {}, 预约: {}, 商品: {}, 服务: {}, 销售: {}, 失败: {:?}",
            state.clients.len(),
            state.appointments.len(),
            state.products.len(),
            state.services.len(),
            state.sales.len(),
            report.failed
        );
        report
    }
}

#[async_trait]
impl Resync for DataSyncer {
    async fn refetch_all(&self) -> SyncReport {
        self.fetch_all().await
    }
}

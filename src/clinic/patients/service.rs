//! 客户/宠物变更服务
//!
//! 新建客户直接合并服务器返回的实体；新建宠物后触发全量同步；删除宠物后在本地剔除。

use crate::clinic::error::Result;
use crate::clinic::guard::MutationGuard;
use crate::clinic::notifier::{messages, Notifier};
use crate::clinic::patients::api::PatientApi;
use crate::clinic::patients::models::{Client, NewClient, NewPet};
use crate::clinic::state::{upsert_by_id, SharedState};
use crate::clinic::sync::Resync;
use std::sync::Arc;
use tracing::{error, info};

pub struct PatientService {
    api: PatientApi,
    state: SharedState,
    resync: Arc<dyn Resync>,
    notifier: Arc<dyn Notifier>,
    guard: MutationGuard,
}

impl PatientService {
    pub fn new(
        api: PatientApi,
        state: SharedState,
        resync: Arc<dyn Resync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            state,
            resync,
            notifier,
            guard: MutationGuard::new(),
        }
    }

    /// 与其它控制器共用同一个防重入标志
    pub fn with_guard(mut self, guard: MutationGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// 新建客户，成功后把服务器返回的客户追加到本地列表
    pub async fn add_client(&self, client: NewClient) -> Result<Client> {
        let _permit = self.guard.acquire("add_client")?;

        match self.api.create_client(&client).await {
            Ok(created) => {
                info!("[Patients] ✅ 新增客户: {} ({})", created.name, created.id);
                upsert_by_id(&mut self.state.write().await.clients, created.clone());
                Ok(created)
            }
            Err(e) => {
                error!("[Patients] 新增客户失败: {}", e);
                self.notifier
                    .alert(messages::CLIENT_SAVE_FAILED.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// 新建宠物，返回值被丢弃，随后全量同步以刷新客户的宠物列表
    pub async fn add_pet(&self, pet: NewPet) -> Result<()> {
        let _permit = self.guard.acquire("add_pet")?;

        match self.api.create_pet(&pet).await {
            Ok(created) => {
                info!(
                    "[Patients] ✅ 新增宠物: {} ({})，开始全量同步",
                    created.name, created.id
                );
                self.resync.refetch_all().await;
                Ok(())
            }
            Err(e) => {
                error!("[Patients] 新增宠物失败: {}", e);
                self.notifier.alert(messages::PET_SAVE_FAILED.to_string()).await;
                Err(e)
            }
        }
    }

    /// 删除宠物，成功后从所有客户的宠物列表中移除
    ///
    /// 不假设后端做了其它级联清理。
    pub async fn delete_pet(&self, pet_id: i64) -> Result<()> {
        let _permit = self.guard.acquire("delete_pet")?;

        match self.api.delete_pet(pet_id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                let touched = state
                    .clients
                    .iter_mut()
                    .map(|c| c.strip_pet(pet_id))
                    .filter(|changed| *changed)
                    .count();
                info!(
                    "[Patients] ✅ 删除宠物 {}，影响客户数: {}",
                    pet_id, touched
                );
                Ok(())
            }
            Err(e) => {
                error!("[Patients] 删除宠物 {} 失败: {}", pet_id, e);
                self.notifier
                    .alert(messages::PET_DELETE_FAILED.to_string())
                    .await;
                Err(e)
            }
        }
    }
}

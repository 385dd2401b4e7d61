//! 通用增删改管理器
//!
//! 商品和服务共用同一套流程：打开新建/编辑表单、保存、确认后删除。
//! 成功时把服务器返回的条目合并进本地列表；失败时提示用户，本地状态不变。

use crate::clinic::error::{ClinicError, Result};
use crate::clinic::guard::MutationGuard;
use crate::clinic::inventory::api::InventoryApi;
use crate::clinic::inventory::catalog::CatalogItem;
use crate::clinic::inventory::form::ItemForm;
use crate::clinic::notifier::{messages, Notifier};
use crate::clinic::state::{remove_by_id, replace_by_id, upsert_by_id, SharedState};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CrudManager<T: CatalogItem> {
    api: InventoryApi,
    state: SharedState,
    notifier: Arc<dyn Notifier>,
    guard: MutationGuard,
    /// 编辑面板，打开时为 Some
    editor: Option<ItemForm<T>>,
}

impl<T: CatalogItem> CrudManager<T> {
    pub fn new(api: InventoryApi, state: SharedState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            state,
            notifier,
            guard: MutationGuard::new(),
            editor: None,
        }
    }

    /// 与其它控制器共用同一个防重入标志
    pub fn with_guard(mut self, guard: MutationGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn label(&self) -> &'static str {
        T::LABEL
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// 当前列表
    pub async fn items(&self) -> Vec<T> {
        T::collection(&*self.state.read().await).clone()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        T::columns().iter().map(|c| c.header).collect()
    }

    /// 按列渲染后的表格行
    pub async fn rows(&self) -> Vec<Vec<String>> {
        let columns = T::columns();
        let state = self.state.read().await;
        T::collection(&state)
            .iter()
            .map(|item| columns.iter().map(|c| (c.accessor)(item)).collect())
            .collect()
    }

    /// 清空编辑目标，打开空白表单
    pub fn open_create(&mut self) {
        self.editor = Some(ItemForm::new(None));
    }

    /// 以指定条目为编辑目标，打开预填表单
    pub fn open_edit(&mut self, item: &T) {
        self.editor = Some(ItemForm::new(Some(item)));
    }

    pub fn close(&mut self) {
        self.editor = None;
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&ItemForm<T>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ItemForm<T>> {
        self.editor.as_mut()
    }

    /// 提交编辑面板
    ///
    /// 校验失败时面板保持打开并显示内联错误，不发请求；校验通过后先关闭面板再保存。
    pub async fn submit(&mut self) -> Result<T> {
        let items = self.items().await;
        let form = self
            .editor
            .as_mut()
            .ok_or_else(|| ClinicError::Validation(format!("{} 表单未打开", T::LABEL)))?;

        let draft = form.submit(&items)?;
        let target = form.editing_id();
        self.editor = None;

        self.save(target, draft).await
    }

    /// 有编辑目标时更新，否则新建
    pub async fn save(&self, target: Option<i64>, draft: T::Draft) -> Result<T> {
        let _permit = self.guard.acquire(T::LABEL)?;

        let result = match target {
            Some(id) => self.api.update_catalog::<T>(id, &draft).await,
            None => self.api.create_catalog::<T>(&draft).await,
        };

        match result {
            Ok(saved) => {
                let mut state = self.state.write().await;
                let items = T::collection_mut(&mut state);
                match target {
                    Some(id) => {
                        if !replace_by_id(items, saved.clone()) {
                            warn!("[Crud] 本地不存在 {} {}，忽略合并", T::LABEL, id);
                        }
                        info!("[Crud] ✅ 更新 {}: {}", T::LABEL, saved.name());
                    }
                    None => {
                        upsert_by_id(items, saved.clone());
                        info!("[Crud] ✅ 新增 {}: {} ({})", T::LABEL, saved.name(), saved.id());
                    }
                }
                Ok(saved)
            }
            Err(e) => {
                error!("[Crud] 保存 {} 失败: {}", T::LABEL, e);
                self.notifier.alert(messages::save_failed(T::LABEL)).await;
                Err(e)
            }
        }
    }

    /// 确认后删除，返回是否真正执行了删除
    pub async fn delete(&self, id: i64) -> Result<bool> {
        if !self
            .notifier
            .confirm(messages::confirm_delete(T::LABEL))
            .await
        {
            info!("[Crud] 用户取消删除 {} {}", T::LABEL, id);
            return Ok(false);
        }

        let _permit = self.guard.acquire(T::LABEL)?;

        match self.api.delete_catalog::<T>(id).await {
            Ok(()) => {
                remove_by_id(T::collection_mut(&mut *self.state.write().await), id);
                info!("[Crud] ✅ 删除 {} {}", T::LABEL, id);
                Ok(true)
            }
            Err(e) => {
                error!("[Crud] 删除 {} {} 失败: {}", T::LABEL, id, e);
                self.notifier.alert(messages::delete_failed(T::LABEL)).await;
                Err(e)
            }
        }
    }
}

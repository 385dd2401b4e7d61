//! 编辑表单
//!
//! 提交前在本地做必填项和重名检查，失败时只设置内联错误，不发请求。

use crate::clinic::error::{ClinicError, Result};
use crate::clinic::inventory::catalog::{CatalogDraft, CatalogItem};
use std::marker::PhantomData;
use tracing::debug;

pub struct ItemForm<T: CatalogItem> {
    editing_id: Option<i64>,
    /// 表单当前字段值
    pub draft: T::Draft,
    error: Option<String>,
    _item: PhantomData<fn() -> T>,
}

impl<T: CatalogItem> ItemForm<T> {
    /// 新建（无初始数据）或编辑（预填条目字段）
    pub fn new(initial: Option<&T>) -> Self {
        Self {
            editing_id: initial.map(|item| item.id()),
            draft: initial.map(T::to_draft).unwrap_or_default(),
            error: None,
            _item: PhantomData,
        }
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    /// 内联错误文本
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 校验并返回待提交的数据
    ///
    /// `items` 是当前列表，用于重名检查。
    pub fn submit(&mut self, items: &[T]) -> Result<T::Draft> {
        self.error = None;

        if let Err(message) = self.draft.validate() {
            return Err(self.reject(message));
        }
        if T::is_duplicate_name(items, self.draft.name(), self.editing_id) {
            return Err(self.reject(T::DUPLICATE_MESSAGE.to_string()));
        }

        Ok(self.draft.clone())
    }

    fn reject(&mut self, message: String) -> ClinicError {
        debug!("[Form] {} 表单校验失败: {}", T::LABEL, message);
        self.error = Some(message.clone());
        ClinicError::Validation(message)
    }
}

//! 变更请求防重入
//!
//! 每个控制器持有一个 `MutationGuard`，请求未结束前再次触发直接失败，不发网络请求。

use crate::clinic::error::{ClinicError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default, Debug)]
pub struct MutationGuard {
    busy: Arc<AtomicBool>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前是否有请求在途（UI 据此禁用按钮）
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 获取许可，许可析构时释放
    pub fn acquire(&self, operation: &str) -> Result<MutationPermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("[Guard] {} 已在处理中，忽略重复提交", operation);
            return Err(ClinicError::MutationInProgress);
        }
        Ok(MutationPermit {
            busy: self.busy.clone(),
        })
    }
}

#[must_use]
pub struct MutationPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

//! SDK 统一错误类型
//!
//! 所有失败都在发生的位置处理（弹窗提示或内联错误），这里只负责分类。

use thiserror::Error;

/// 客户端操作错误
#[derive(Debug, Error)]
pub enum ClinicError {
    /// 网络层失败（连接失败、读取 body 失败等）
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务器返回非 2xx 状态
    #[error("HTTP 错误 {status}: {body}")]
    Http { status: u16, body: String },

    /// 响应 JSON 格式错误
    #[error("反序列化响应失败: {0}")]
    Decode(#[from] serde_json::Error),

    /// 提交前的本地校验失败（重名、必填项等）
    #[error("{0}")]
    Validation(String),

    /// 购物车数量已达到商品库存上限
    #[error("商品 {product_id} 库存不足，当前库存: {stock}")]
    OutOfStock { product_id: i64, stock: i64 },

    /// 同一控制器上已有变更请求未完成
    #[error("已有请求正在处理中")]
    MutationInProgress,

    /// 配置无效
    #[error("配置错误: {0}")]
    Config(String),
}

impl ClinicError {
    /// 是否为服务器返回的 HTTP 错误
    pub fn is_http(&self) -> bool {
        matches!(self, ClinicError::Http { .. })
    }

    /// HTTP 状态码（仅 `Http` 变体）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClinicError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;

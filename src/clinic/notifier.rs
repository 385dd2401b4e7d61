//! 用户提示回调接口
//!
//! 变更操作失败时的阻塞提示、删除前的确认都通过宿主注册的 `Notifier` 完成。

use async_trait::async_trait;
use tracing::{info, warn};

/// 面向用户的提示文本
pub mod messages {
    pub const PRODUCT_OUT_OF_STOCK: &str = "Produto sem estoque!";
    pub const SALE_FINALIZED: &str = "Venda finalizada com sucesso!";
    pub const SALE_FAILED: &str = "Falha ao finalizar a venda.";
    pub const SALES_HISTORY_FAILED: &str = "Falha ao carregar o histórico de vendas.";
    pub const FORECAST_FAILED: &str = "Falha ao gerar a previsão. Tente novamente.";
    pub const CLIENT_SAVE_FAILED: &str = "Falha ao salvar Cliente";
    pub const PET_SAVE_FAILED: &str = "Falha ao salvar Pet";
    pub const PET_DELETE_FAILED: &str = "Falha ao excluir Pet";
    pub const APPOINTMENT_SAVE_FAILED: &str = "Falha ao salvar Agendamento";
    pub const APPOINTMENT_STATUS_FAILED: &str = "Falha ao atualizar o status do agendamento";
    pub const REQUIRED_NAME: &str = "O nome é obrigatório.";
    pub const INVALID_PRICE: &str = "O preço deve ser um valor não negativo.";
    pub const INVALID_STOCK: &str = "O estoque deve ser um valor não negativo.";

    /// "Falha ao salvar Produto"
    pub fn save_failed(label: &str) -> String {
        format!("Falha ao salvar {}", label)
    }

    /// "Falha ao excluir Serviço"
    pub fn delete_failed(label: &str) -> String {
        format!("Falha ao excluir {}", label)
    }

    /// "Tem certeza que deseja excluir este Produto?"
    pub fn confirm_delete(label: &str) -> String {
        format!("Tem certeza que deseja excluir este {}?", label)
    }
}

/// 用户提示回调接口
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 阻塞式提示（失败、成功、库存警告）
    async fn alert(&self, message: String);

    /// 破坏性操作前的确认，返回 true 表示用户同意
    async fn confirm(&self, message: String) -> bool;
}

/// 默认空实现：提示只写日志，确认一律拒绝
pub struct EmptyNotifier;

#[async_trait]
impl Notifier for EmptyNotifier {
    async fn alert(&self, message: String) {
        info!("[Notifier] {}", message);
    }

    async fn confirm(&self, message: String) -> bool {
        warn!("[Notifier] 未注册确认回调，拒绝: {}", message);
        false
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 带有服务器分配 ID 的实体
///
/// 本地列表按 ID 合并、替换和删除，客户端从不自行分配 ID。
pub trait Identified {
    fn id(&self) -> i64;
}

/// 应用页面（侧边栏导航项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    #[serde(rename = "Dashboard")]
    Dashboard,
    #[serde(rename = "Clientes")]
    Clients,
    #[serde(rename = "Agendamentos")]
    Appointments,
    #[serde(rename = "Estoque")]
    Inventory,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Dashboard,
        Page::Clients,
        Page::Appointments,
        Page::Inventory,
    ];

    /// 页面显示名称
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Clients => "Clientes",
            Page::Appointments => "Agendamentos",
            Page::Inventory => "Estoque",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 分页列表结果：当前窗口数据 + 服务器可选返回的总数（X-Total-Count）
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_count: Option<u64>,
}

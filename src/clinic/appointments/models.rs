//! 预约数据结构

use crate::clinic::types::Identified;
use serde::{Deserialize, Serialize};

/// 预约状态
///
/// 客户端不限制状态流转，任意状态都可以切换到任意状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "Agendado")]
    Scheduled,
    #[serde(rename = "Concluído")]
    Completed,
    #[serde(rename = "Cancelado")]
    Canceled,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Agendado",
            AppointmentStatus::Completed => "Concluído",
            AppointmentStatus::Canceled => "Cancelado",
        }
    }
}

/// 预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub pet_id: i64,
    /// ISO 日期时间字符串
    pub date: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

/// 新建预约请求体（不含 id）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub client_id: i64,
    pub pet_id: i64,
    pub date: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

impl Identified for Appointment {
    fn id(&self) -> i64 {
        self.id
    }
}

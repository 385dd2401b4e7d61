//! 预约变更服务

use crate::clinic::appointments::api::AppointmentApi;
use crate::clinic::appointments::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::clinic::error::Result;
use crate::clinic::guard::MutationGuard;
use crate::clinic::notifier::{messages, Notifier};
use crate::clinic::state::{replace_by_id, upsert_by_id, SharedState};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct AppointmentService {
    api: AppointmentApi,
    state: SharedState,
    notifier: Arc<dyn Notifier>,
    guard: MutationGuard,
}

impl AppointmentService {
    pub fn new(api: AppointmentApi, state: SharedState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            state,
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

    /// 新建预约，成功后追加服务器返回的预约
    pub async fn add_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let _permit = self.guard.acquire("add_appointment")?;

        match self.api.create(&appointment).await {
            Ok(created) => {
                info!("[Appointments] ✅ 新增预约: {}", created.id);
                upsert_by_id(&mut self.state.write().await.appointments, created.clone());
                Ok(created)
            }
            Err(e) => {
                error!("[Appointments] 新增预约失败: {}", e);
                self.notifier
                    .alert(messages::APPOINTMENT_SAVE_FAILED.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// 修改预约状态，成功后按 id 替换本地预约
    pub async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        let _permit = self.guard.acquire("update_status")?;

        match self.api.update_status(id, status).await {
            Ok(updated) => {
                info!(
                    "[Appointments] ✅ 预约 {} 状态更新为 {}",
                    id,
                    updated.status.label()
                );
                if !replace_by_id(&mut self.state.write().await.appointments, updated.clone()) {
                    warn!("[Appointments] 本地不存在预约 {}，等待下次全量同步", id);
                }
                Ok(updated)
            }
            Err(e) => {
                error!("[Appointments] 预约 {} 状态更新失败: {}", id, e);
                self.notifier
                    .alert(messages::APPOINTMENT_STATUS_FAILED.to_string())
                    .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinic::gateway::RestGateway;
    use crate::clinic::sync::DataSyncer;
    use crate::clinic::testing::{fixtures, mount_collections, RecordingNotifier};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn status_change_replaces_local_copy() {
        let server = MockServer::start().await;
        mount_collections(&server).await;
        let mut updated = fixtures::appointment(3);
        updated["status"] = serde_json::json!("Cancelado");
        Mock::given(method("PUT"))
            .and(path("/appointments/3/status"))
            .and(body_json(serde_json::json!({"status": "Cancelado"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = RestGateway::connect(&server.uri()).unwrap();
        let syncer = DataSyncer::new(gateway.clone());
        syncer.fetch_all().await;
        let notifier = Arc::new(RecordingNotifier::new(true));
        let service =
            AppointmentService::new(AppointmentApi::new(gateway), syncer.state(), notifier);

        service
            .update_status(3, AppointmentStatus::Canceled)
            .await
            .unwrap();

        let state = syncer.snapshot().await;
        assert_eq!(state.appointments.len(), 1);
        assert_eq!(state.appointments[0].status, AppointmentStatus::Canceled);
    }

    #[tokio::test]
    async fn failed_create_alerts_and_appends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/appointments/"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let gateway = RestGateway::connect(&server.uri()).unwrap();
        let syncer = DataSyncer::new(gateway.clone());
        let notifier = Arc::new(RecordingNotifier::new(true));
        let service = AppointmentService::new(
            AppointmentApi::new(gateway),
            syncer.state(),
            notifier.clone(),
        );

        let result = service
            .add_appointment(NewAppointment {
                client_id: 1,
                pet_id: 7,
                date: "2025-03-01T10:00".into(),
                reason: "Consulta".into(),
                notes: None,
                status: AppointmentStatus::Scheduled,
            })
            .await;
        assert!(result.is_err());
        assert!(syncer.snapshot().await.appointments.is_empty());
        assert_eq!(
            notifier.alerts(),
            vec![messages::APPOINTMENT_SAVE_FAILED.to_string()]
        );
    }
}

//! 预约 HTTP API

use crate::clinic::appointments::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::clinic::error::Result;
use crate::clinic::gateway::RestGateway;
use tracing::info;

pub const APPOINTMENTS_PATH: &str = "/appointments/";

#[derive(Clone)]
pub struct AppointmentApi {
    gateway: RestGateway,
}

impl AppointmentApi {
    pub fn new(gateway: RestGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.gateway.list(APPOINTMENTS_PATH).await?;
        info!("[AppointmentAPI] ✅ 预约列表响应，条目数: {}", appointments.len());
        Ok(appointments)
    }

    pub async fn create(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.gateway.create(APPOINTMENTS_PATH, appointment).await
    }

    /// PUT /appointments/{id}/status
    pub async fn update_status(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        self.gateway
            .status_transition(APPOINTMENTS_PATH, id, &status)
            .await
    }
}

//! 预约模块

pub mod api;
pub mod models;
pub mod service;

pub use api::AppointmentApi;
pub use models::{Appointment, AppointmentStatus, NewAppointment};
pub use service::AppointmentService;

//! 客户与宠物模块

pub mod api;
pub mod models;
pub mod service;

pub use api::PatientApi;
pub use models::{Client, NewClient, NewPet, Pet, Species};
pub use service::PatientService;

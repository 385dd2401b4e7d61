//! 客户/宠物 HTTP API

use crate::clinic::error::Result;
use crate::clinic::gateway::RestGateway;
use crate::clinic::patients::models::{Client, NewClient, NewPet, Pet};
use tracing::info;

pub const CLIENTS_PATH: &str = "/clients/";
pub const PETS_PATH: &str = "/pets/";

/// 客户与宠物相关的 HTTP API 客户端
#[derive(Clone)]
pub struct PatientApi {
    gateway: RestGateway,
}

impl PatientApi {
    pub fn new(gateway: RestGateway) -> Self {
        Self { gateway }
    }

    /// 获取全部客户（含宠物）
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let clients: Vec<Client> = self.gateway.list(CLIENTS_PATH).await?;
        info!("[PatientAPI] ✅ 客户列表响应，客户数: {}", clients.len());
        Ok(clients)
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        self.gateway.create(CLIENTS_PATH, client).await
    }

    pub async fn create_pet(&self, pet: &NewPet) -> Result<Pet> {
        self.gateway.create(PETS_PATH, pet).await
    }

    pub async fn delete_pet(&self, pet_id: i64) -> Result<()> {
        self.gateway.delete(PETS_PATH, pet_id).await
    }
}

//! 客户与宠物数据结构

use crate::clinic::types::Identified;
use serde::{Deserialize, Serialize};

/// 宠物物种（后端使用葡萄牙语标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "Cachorro")]
    Dog,
    #[serde(rename = "Gato")]
    Cat,
    #[serde(rename = "Pássaro")]
    Bird,
    #[serde(rename = "Roedor")]
    Rodent,
    #[serde(rename = "Outro")]
    Other,
}

/// 宠物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub species: Species,
    pub breed: String,
    /// ISO 日期字符串
    pub birth_date: String,
    pub owner_id: i64,
}

/// 新建宠物请求体（不含 id）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub birth_date: String,
    pub owner_id: i64,
}

/// 客户（宠物主人）
///
/// `pets` 可能缺失，或在下一次全量同步前是旧数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Pet>>,
}

/// 新建客户请求体（不含 id）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Identified for Pet {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Client {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Client {
    /// 从宠物列表中移除指定宠物，返回是否有变化
    pub fn strip_pet(&mut self, pet_id: i64) -> bool {
        match self.pets.as_mut() {
            Some(pets) => {
                let before = pets.len();
                pets.retain(|p| p.id != pet_id);
                pets.len() != before
            }
            None => false,
        }
    }

    pub fn pet_count(&self) -> usize {
        self.pets.as_ref().map_or(0, Vec::len)
    }
}

//! 兽医诊所客户端 SDK
//!
//! 所有持久化都在 REST 后端，这里只维护内存中的集合并协调各页面的请求。

pub mod appointments;
pub mod client;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod guard;
pub mod inventory;
pub mod notifier;
pub mod patients;
pub mod state;
pub mod sync;
pub mod types;

#[cfg(test)]
mod testing;

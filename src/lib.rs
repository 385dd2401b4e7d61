pub mod clinic;

// 重新导出常用类型，方便外部使用
pub use clinic::{
    client::{ClientConfig, ClinicClient, PageView},
    error::{ClinicError, Result},
    notifier::{EmptyNotifier, Notifier},
    sync::{DataSyncer, SyncReport},
    types::Page,
};
